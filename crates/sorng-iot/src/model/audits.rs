//! Device Defender audits.

use super::epoch_seconds;
use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Operations ──────────────────────────────────────────────────────────

pub static START_ON_DEMAND_AUDIT_TASK: OperationSpec = OperationSpec {
    name: "StartOnDemandAuditTask",
    method: HttpMethod::Post,
    uri: "/audit/tasks",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DESCRIBE_AUDIT_TASK: OperationSpec = OperationSpec {
    name: "DescribeAuditTask",
    method: HttpMethod::Get,
    uri: "/audit/tasks/{taskId}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_AUDIT_TASKS: OperationSpec = OperationSpec {
    name: "ListAuditTasks",
    method: HttpMethod::Get,
    uri: "/audit/tasks",
    query: &[
        ("startTime", "startTime"),
        ("endTime", "endTime"),
        ("taskType", "taskType"),
        ("taskStatus", "taskStatus"),
        ("nextToken", "nextToken"),
        ("maxResults", "maxResults"),
    ],
    headers: &[],
    payload: None,
};

pub static CANCEL_AUDIT_TASK: OperationSpec = OperationSpec {
    name: "CancelAuditTask",
    method: HttpMethod::Put,
    uri: "/audit/tasks/{taskId}/cancel",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DESCRIBE_ACCOUNT_AUDIT_CONFIGURATION: OperationSpec = OperationSpec {
    name: "DescribeAccountAuditConfiguration",
    method: HttpMethod::Get,
    uri: "/audit/configuration",
    query: &[],
    headers: &[],
    payload: None,
};

pub static UPDATE_ACCOUNT_AUDIT_CONFIGURATION: OperationSpec = OperationSpec {
    name: "UpdateAccountAuditConfiguration",
    method: HttpMethod::Patch,
    uri: "/audit/configuration",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_AUDIT_FINDINGS: OperationSpec = OperationSpec {
    name: "ListAuditFindings",
    method: HttpMethod::Post,
    uri: "/audit/findings",
    query: &[],
    headers: &[],
    payload: None,
};

// ── Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditTaskStatus {
    InProgress,
    Completed,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditTaskType {
    OnDemandAuditTask,
    ScheduledAuditTask,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartOnDemandAuditTaskRequest {
    /// Check names such as `DEVICE_CERTIFICATE_EXPIRING_CHECK`.
    pub target_check_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartOnDemandAuditTaskResponse {
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditTaskIdRequest {
    pub task_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub total_checks: Option<i64>,
    pub in_progress_checks: Option<i64>,
    pub waiting_for_data_collection_checks: Option<i64>,
    pub compliant_checks: Option<i64>,
    pub non_compliant_checks: Option<i64>,
    pub failed_checks: Option<i64>,
    pub canceled_checks: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditCheckDetails {
    pub check_run_status: Option<String>,
    pub check_compliant: Option<bool>,
    pub total_resources_count: Option<i64>,
    pub non_compliant_resources_count: Option<i64>,
    pub suppressed_non_compliant_resources_count: Option<i64>,
    pub error_code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeAuditTaskResponse {
    pub task_status: Option<AuditTaskStatus>,
    pub task_type: Option<AuditTaskType>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub task_start_time: Option<DateTime<Utc>>,
    pub task_statistics: Option<TaskStatistics>,
    pub scheduled_audit_name: Option<String>,
    /// Keyed by check name.
    #[serde(default)]
    pub audit_details: HashMap<String, AuditCheckDetails>,
}

/// Query timestamps go out as RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditTasksRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<AuditTaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_status: Option<AuditTaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl ListAuditTasksRequest {
    pub fn between(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            task_type: None,
            task_status: None,
            next_token: None,
            max_results: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditTaskMetadata {
    pub task_id: Option<String>,
    pub task_status: Option<AuditTaskStatus>,
    pub task_type: Option<AuditTaskType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditTasksResponse {
    #[serde(default)]
    pub tasks: Vec<AuditTaskMetadata>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DescribeAccountAuditConfigurationRequest {}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditNotificationTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditCheckConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeAccountAuditConfigurationResponse {
    pub role_arn: Option<String>,
    /// Keyed by target type (`SNS`).
    #[serde(default)]
    pub audit_notification_target_configurations: HashMap<String, AuditNotificationTarget>,
    /// Keyed by check name.
    #[serde(default)]
    pub audit_check_configurations: HashMap<String, AuditCheckConfiguration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountAuditConfigurationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_notification_target_configurations:
        Option<HashMap<String, AuditNotificationTarget>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_check_configurations: Option<HashMap<String, AuditCheckConfiguration>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyVersionIdentifier {
    pub policy_name: Option<String>,
    pub policy_version_id: Option<String>,
}

/// Identifies the resource a finding is about. Only the member matching
/// the resource type is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognito_identity_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_version_identifier: Option<PolicyVersionIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_alias_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NonCompliantResource {
    pub resource_type: Option<String>,
    pub resource_identifier: Option<ResourceIdentifier>,
    pub additional_info: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    pub finding_id: Option<String>,
    pub task_id: Option<String>,
    pub check_name: Option<String>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub task_start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub finding_time: Option<DateTime<Utc>>,
    /// `CRITICAL`, `HIGH`, `MEDIUM` or `LOW`.
    pub severity: Option<String>,
    pub non_compliant_resource: Option<NonCompliantResource>,
    pub reason_for_non_compliance: Option<String>,
    pub reason_for_non_compliance_code: Option<String>,
    pub is_suppressed: Option<bool>,
}

/// Filter either by `task_id` or by a `start_time`/`end_time` window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditFindingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_identifier: Option<ResourceIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_suppressed_findings: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditFindingsResponse {
    #[serde(default)]
    pub findings: Vec<AuditFinding>,
    pub next_token: Option<String>,
}

// ── Facade ──────────────────────────────────────────────────────────────

impl IotClient {
    pub fn start_on_demand_audit_task(
        &self,
        request: impl Into<Request<StartOnDemandAuditTaskRequest>>,
    ) -> IotResult<StartOnDemandAuditTaskResponse> {
        self.call(&START_ON_DEMAND_AUDIT_TASK, request.into())
    }

    pub fn describe_audit_task(
        &self,
        request: impl Into<Request<AuditTaskIdRequest>>,
    ) -> IotResult<DescribeAuditTaskResponse> {
        self.call(&DESCRIBE_AUDIT_TASK, request.into())
    }

    pub fn list_audit_tasks(
        &self,
        request: impl Into<Request<ListAuditTasksRequest>>,
    ) -> IotResult<ListAuditTasksResponse> {
        self.call(&LIST_AUDIT_TASKS, request.into())
    }

    /// Only tasks still `IN_PROGRESS` can be canceled.
    pub fn cancel_audit_task(&self, request: impl Into<Request<AuditTaskIdRequest>>) -> IotResult<()> {
        self.call_unit(&CANCEL_AUDIT_TASK, request.into())
    }

    pub fn describe_account_audit_configuration(
        &self,
        request: impl Into<Request<DescribeAccountAuditConfigurationRequest>>,
    ) -> IotResult<DescribeAccountAuditConfigurationResponse> {
        self.call(&DESCRIBE_ACCOUNT_AUDIT_CONFIGURATION, request.into())
    }

    pub fn update_account_audit_configuration(
        &self,
        request: impl Into<Request<UpdateAccountAuditConfigurationRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&UPDATE_ACCOUNT_AUDIT_CONFIGURATION, request.into())
    }

    pub fn list_audit_findings(
        &self,
        request: impl Into<Request<ListAuditFindingsRequest>>,
    ) -> IotResult<ListAuditFindingsResponse> {
        self.call(&LIST_AUDIT_FINDINGS, request.into())
    }
}
