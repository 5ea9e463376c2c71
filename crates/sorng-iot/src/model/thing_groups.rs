//! Thing groups.

use super::things::AttributePayload;
use super::{epoch_seconds, Tag};
use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Operations ──────────────────────────────────────────────────────────

pub static CREATE_THING_GROUP: OperationSpec = OperationSpec {
    name: "CreateThingGroup",
    method: HttpMethod::Post,
    uri: "/thing-groups/{thingGroupName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DESCRIBE_THING_GROUP: OperationSpec = OperationSpec {
    name: "DescribeThingGroup",
    method: HttpMethod::Get,
    uri: "/thing-groups/{thingGroupName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_THING_GROUPS: OperationSpec = OperationSpec {
    name: "ListThingGroups",
    method: HttpMethod::Get,
    uri: "/thing-groups",
    query: &[
        ("nextToken", "nextToken"),
        ("maxResults", "maxResults"),
        ("parentGroup", "parentGroup"),
        ("namePrefixFilter", "namePrefixFilter"),
        ("recursive", "recursive"),
    ],
    headers: &[],
    payload: None,
};

pub static DELETE_THING_GROUP: OperationSpec = OperationSpec {
    name: "DeleteThingGroup",
    method: HttpMethod::Delete,
    uri: "/thing-groups/{thingGroupName}",
    query: &[("expectedVersion", "expectedVersion")],
    headers: &[],
    payload: None,
};

pub static ADD_THING_TO_THING_GROUP: OperationSpec = OperationSpec {
    name: "AddThingToThingGroup",
    method: HttpMethod::Put,
    uri: "/thing-groups/addThingToThingGroup",
    query: &[],
    headers: &[],
    payload: None,
};

pub static REMOVE_THING_FROM_THING_GROUP: OperationSpec = OperationSpec {
    name: "RemoveThingFromThingGroup",
    method: HttpMethod::Put,
    uri: "/thing-groups/removeThingFromThingGroup",
    query: &[],
    headers: &[],
    payload: None,
};

// ── Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingGroupProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_group_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_payload: Option<AttributePayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupNameAndArn {
    pub group_name: Option<String>,
    pub group_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingGroupMetadata {
    pub parent_group_name: Option<String>,
    #[serde(default)]
    pub root_to_parent_thing_groups: Vec<GroupNameAndArn>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateThingGroupRequest {
    pub thing_group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_group_properties: Option<ThingGroupProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateThingGroupResponse {
    pub thing_group_name: Option<String>,
    pub thing_group_arn: Option<String>,
    pub thing_group_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeThingGroupRequest {
    pub thing_group_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeThingGroupResponse {
    pub thing_group_name: Option<String>,
    pub thing_group_id: Option<String>,
    pub thing_group_arn: Option<String>,
    pub version: Option<i64>,
    pub thing_group_properties: Option<ThingGroupProperties>,
    pub thing_group_metadata: Option<ThingGroupMetadata>,
    /// Set for dynamic groups only.
    pub index_name: Option<String>,
    pub query_string: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingGroupsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_prefix_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingGroupsResponse {
    #[serde(default)]
    pub thing_groups: Vec<GroupNameAndArn>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteThingGroupRequest {
    pub thing_group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
}

/// Input of `AddThingToThingGroup` and `RemoveThingFromThingGroup`. Name
/// the group and the thing either by name or by ARN.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingGroupMembershipRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_group_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_arn: Option<String>,
    /// Only meaningful when adding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_dynamic_groups: Option<bool>,
}

impl ThingGroupMembershipRequest {
    pub fn by_name(thing_group_name: &str, thing_name: &str) -> Self {
        Self {
            thing_group_name: Some(thing_group_name.to_string()),
            thing_name: Some(thing_name.to_string()),
            ..Self::default()
        }
    }
}

// ── Facade ──────────────────────────────────────────────────────────────

impl IotClient {
    pub fn create_thing_group(
        &self,
        request: impl Into<Request<CreateThingGroupRequest>>,
    ) -> IotResult<CreateThingGroupResponse> {
        self.call(&CREATE_THING_GROUP, request.into())
    }

    pub fn describe_thing_group(
        &self,
        request: impl Into<Request<DescribeThingGroupRequest>>,
    ) -> IotResult<DescribeThingGroupResponse> {
        self.call(&DESCRIBE_THING_GROUP, request.into())
    }

    pub fn list_thing_groups(
        &self,
        request: impl Into<Request<ListThingGroupsRequest>>,
    ) -> IotResult<ListThingGroupsResponse> {
        self.call(&LIST_THING_GROUPS, request.into())
    }

    pub fn delete_thing_group(
        &self,
        request: impl Into<Request<DeleteThingGroupRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&DELETE_THING_GROUP, request.into())
    }

    pub fn add_thing_to_thing_group(
        &self,
        request: impl Into<Request<ThingGroupMembershipRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&ADD_THING_TO_THING_GROUP, request.into())
    }

    pub fn remove_thing_from_thing_group(
        &self,
        request: impl Into<Request<ThingGroupMembershipRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&REMOVE_THING_FROM_THING_GROUP, request.into())
    }
}
