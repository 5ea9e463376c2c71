//! IoT policies and policy versions.

use super::{epoch_seconds, Tag};
use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Operations ──────────────────────────────────────────────────────────

pub static CREATE_POLICY: OperationSpec = OperationSpec {
    name: "CreatePolicy",
    method: HttpMethod::Post,
    uri: "/policies/{policyName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static GET_POLICY: OperationSpec = OperationSpec {
    name: "GetPolicy",
    method: HttpMethod::Get,
    uri: "/policies/{policyName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_POLICIES: OperationSpec = OperationSpec {
    name: "ListPolicies",
    method: HttpMethod::Get,
    uri: "/policies",
    query: &[
        ("marker", "marker"),
        ("pageSize", "pageSize"),
        ("isAscendingOrder", "ascendingOrder"),
    ],
    headers: &[],
    payload: None,
};

pub static DELETE_POLICY: OperationSpec = OperationSpec {
    name: "DeletePolicy",
    method: HttpMethod::Delete,
    uri: "/policies/{policyName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static ATTACH_POLICY: OperationSpec = OperationSpec {
    name: "AttachPolicy",
    method: HttpMethod::Put,
    uri: "/target-policies/{policyName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DETACH_POLICY: OperationSpec = OperationSpec {
    name: "DetachPolicy",
    method: HttpMethod::Post,
    uri: "/target-policies/{policyName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static CREATE_POLICY_VERSION: OperationSpec = OperationSpec {
    name: "CreatePolicyVersion",
    method: HttpMethod::Post,
    uri: "/policies/{policyName}/version",
    query: &[("setAsDefault", "setAsDefault")],
    headers: &[],
    payload: None,
};

pub static LIST_POLICY_VERSIONS: OperationSpec = OperationSpec {
    name: "ListPolicyVersions",
    method: HttpMethod::Get,
    uri: "/policies/{policyName}/version",
    query: &[],
    headers: &[],
    payload: None,
};

// ── Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyRequest {
    pub policy_name: String,
    /// JSON policy document, as a string.
    pub policy_document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyResponse {
    pub policy_name: Option<String>,
    pub policy_arn: Option<String>,
    pub policy_document: Option<String>,
    pub policy_version_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyNameRequest {
    pub policy_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetPolicyResponse {
    pub policy_name: Option<String>,
    pub policy_arn: Option<String>,
    pub policy_document: Option<String>,
    pub default_version_id: Option<String>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
    pub generation_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListPoliciesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascending_order: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub policy_name: Option<String>,
    pub policy_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListPoliciesResponse {
    #[serde(default)]
    pub policies: Vec<Policy>,
    pub next_marker: Option<String>,
}

/// Input of `AttachPolicy` and `DetachPolicy`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTargetRequest {
    pub policy_name: String,
    /// Certificate ARN, thing group ARN or Cognito identity.
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyVersionRequest {
    pub policy_name: String,
    pub policy_document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_as_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyVersionResponse {
    pub policy_arn: Option<String>,
    pub policy_document: Option<String>,
    pub policy_version_id: Option<String>,
    pub is_default_version: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyVersion {
    pub version_id: Option<String>,
    pub is_default_version: Option<bool>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListPolicyVersionsResponse {
    #[serde(default)]
    pub policy_versions: Vec<PolicyVersion>,
}

// ── Facade ──────────────────────────────────────────────────────────────

impl IotClient {
    pub fn create_policy(
        &self,
        request: impl Into<Request<CreatePolicyRequest>>,
    ) -> IotResult<CreatePolicyResponse> {
        self.call(&CREATE_POLICY, request.into())
    }

    pub fn get_policy(
        &self,
        request: impl Into<Request<PolicyNameRequest>>,
    ) -> IotResult<GetPolicyResponse> {
        self.call(&GET_POLICY, request.into())
    }

    pub fn list_policies(
        &self,
        request: impl Into<Request<ListPoliciesRequest>>,
    ) -> IotResult<ListPoliciesResponse> {
        self.call(&LIST_POLICIES, request.into())
    }

    /// Fails with `DeleteConflict` while the policy is attached or has
    /// non-default versions.
    pub fn delete_policy(&self, request: impl Into<Request<PolicyNameRequest>>) -> IotResult<()> {
        self.call_unit(&DELETE_POLICY, request.into())
    }

    pub fn attach_policy(&self, request: impl Into<Request<PolicyTargetRequest>>) -> IotResult<()> {
        self.call_unit(&ATTACH_POLICY, request.into())
    }

    pub fn detach_policy(&self, request: impl Into<Request<PolicyTargetRequest>>) -> IotResult<()> {
        self.call_unit(&DETACH_POLICY, request.into())
    }

    pub fn create_policy_version(
        &self,
        request: impl Into<Request<CreatePolicyVersionRequest>>,
    ) -> IotResult<CreatePolicyVersionResponse> {
        self.call(&CREATE_POLICY_VERSION, request.into())
    }

    pub fn list_policy_versions(
        &self,
        request: impl Into<Request<PolicyNameRequest>>,
    ) -> IotResult<ListPolicyVersionsResponse> {
        self.call(&LIST_POLICY_VERSIONS, request.into())
    }
}
