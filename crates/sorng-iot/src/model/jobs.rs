//! Jobs: remote operations pushed to a set of things.

use super::{epoch_seconds, Tag};
use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Operations ──────────────────────────────────────────────────────────

pub static CREATE_JOB: OperationSpec = OperationSpec {
    name: "CreateJob",
    method: HttpMethod::Put,
    uri: "/jobs/{jobId}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DESCRIBE_JOB: OperationSpec = OperationSpec {
    name: "DescribeJob",
    method: HttpMethod::Get,
    uri: "/jobs/{jobId}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_JOBS: OperationSpec = OperationSpec {
    name: "ListJobs",
    method: HttpMethod::Get,
    uri: "/jobs",
    query: &[
        ("status", "status"),
        ("targetSelection", "targetSelection"),
        ("maxResults", "maxResults"),
        ("nextToken", "nextToken"),
        ("thingGroupName", "thingGroupName"),
        ("thingGroupId", "thingGroupId"),
    ],
    headers: &[],
    payload: None,
};

pub static CANCEL_JOB: OperationSpec = OperationSpec {
    name: "CancelJob",
    method: HttpMethod::Put,
    uri: "/jobs/{jobId}/cancel",
    query: &[("force", "force")],
    headers: &[],
    payload: None,
};

pub static DELETE_JOB: OperationSpec = OperationSpec {
    name: "DeleteJob",
    method: HttpMethod::Delete,
    uri: "/jobs/{jobId}",
    query: &[("force", "force")],
    headers: &[],
    payload: None,
};

pub static DESCRIBE_JOB_EXECUTION: OperationSpec = OperationSpec {
    name: "DescribeJobExecution",
    method: HttpMethod::Get,
    uri: "/things/{thingName}/jobs/{jobId}",
    query: &[("executionNumber", "executionNumber")],
    headers: &[],
    payload: None,
};

pub static LIST_JOB_EXECUTIONS_FOR_JOB: OperationSpec = OperationSpec {
    name: "ListJobExecutionsForJob",
    method: HttpMethod::Get,
    uri: "/jobs/{jobId}/things",
    query: &[
        ("status", "status"),
        ("maxResults", "maxResults"),
        ("nextToken", "nextToken"),
    ],
    headers: &[],
    payload: None,
};

// ── Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSelection {
    /// Things added to a target group later also run the job.
    Continuous,
    Snapshot,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    InProgress,
    Canceled,
    Completed,
    DeletionInProgress,
    Scheduled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobExecutionStatus {
    Queued,
    InProgress,
    Succeeded,
    Failed,
    TimedOut,
    Rejected,
    Removed,
    Canceled,
}

impl JobExecutionStatus {
    /// Whether the execution has reached a final state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Queued | Self::InProgress)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub job_id: String,
    /// Thing or thing group ARNs.
    pub targets: Vec<String>,
    /// S3 URL of the job document; alternative to `document`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_selection: Option<TargetSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub job_arn: Option<String>,
    pub job_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobIdRequest {
    pub job_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobProcessDetails {
    pub number_of_canceled_things: Option<i64>,
    pub number_of_succeeded_things: Option<i64>,
    pub number_of_failed_things: Option<i64>,
    pub number_of_rejected_things: Option<i64>,
    pub number_of_queued_things: Option<i64>,
    pub number_of_in_progress_things: Option<i64>,
    pub number_of_removed_things: Option<i64>,
    pub number_of_timed_out_things: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_arn: Option<String>,
    pub job_id: Option<String>,
    pub target_selection: Option<TargetSelection>,
    pub status: Option<JobStatus>,
    pub force_canceled: Option<bool>,
    pub reason_code: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    pub description: Option<String>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub job_process_details: Option<JobProcessDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeJobResponse {
    pub document_source: Option<String>,
    pub job: Option<Job>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_selection: Option<TargetSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_group_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub job_arn: Option<String>,
    pub job_id: Option<String>,
    pub thing_group_id: Option<String>,
    pub target_selection: Option<TargetSelection>,
    pub status: Option<JobStatus>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsResponse {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelJobRequest {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Also cancel executions that are already `IN_PROGRESS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteJobRequest {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeJobExecutionRequest {
    pub job_id: String,
    pub thing_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_number: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobExecutionStatusDetails {
    pub details_map: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobExecution {
    pub job_id: Option<String>,
    pub status: Option<JobExecutionStatus>,
    pub force_canceled: Option<bool>,
    pub status_details: Option<JobExecutionStatusDetails>,
    pub thing_arn: Option<String>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    pub execution_number: Option<i64>,
    pub version_number: Option<i64>,
    pub approximate_seconds_before_timed_out: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeJobExecutionResponse {
    pub execution: Option<JobExecution>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListJobExecutionsForJobRequest {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobExecutionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobExecutionSummary {
    pub status: Option<JobExecutionStatus>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    pub execution_number: Option<i64>,
    pub retry_attempt: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobExecutionSummaryForJob {
    pub thing_arn: Option<String>,
    pub job_execution_summary: Option<JobExecutionSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListJobExecutionsForJobResponse {
    #[serde(default)]
    pub execution_summaries: Vec<JobExecutionSummaryForJob>,
    pub next_token: Option<String>,
}

// ── Facade ──────────────────────────────────────────────────────────────

impl IotClient {
    pub fn create_job(&self, request: impl Into<Request<CreateJobRequest>>) -> IotResult<JobResponse> {
        self.call(&CREATE_JOB, request.into())
    }

    pub fn describe_job(
        &self,
        request: impl Into<Request<JobIdRequest>>,
    ) -> IotResult<DescribeJobResponse> {
        self.call(&DESCRIBE_JOB, request.into())
    }

    pub fn list_jobs(&self, request: impl Into<Request<ListJobsRequest>>) -> IotResult<ListJobsResponse> {
        self.call(&LIST_JOBS, request.into())
    }

    pub fn cancel_job(&self, request: impl Into<Request<CancelJobRequest>>) -> IotResult<JobResponse> {
        self.call(&CANCEL_JOB, request.into())
    }

    pub fn delete_job(&self, request: impl Into<Request<DeleteJobRequest>>) -> IotResult<()> {
        self.call_unit(&DELETE_JOB, request.into())
    }

    pub fn describe_job_execution(
        &self,
        request: impl Into<Request<DescribeJobExecutionRequest>>,
    ) -> IotResult<DescribeJobExecutionResponse> {
        self.call(&DESCRIBE_JOB_EXECUTION, request.into())
    }

    pub fn list_job_executions_for_job(
        &self,
        request: impl Into<Request<ListJobExecutionsForJobRequest>>,
    ) -> IotResult<ListJobExecutionsForJobResponse> {
        self.call(&LIST_JOB_EXECUTIONS_FOR_JOB, request.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::marshal;

    #[test]
    fn cancel_splits_query_and_body() {
        let req = marshal(
            &CANCEL_JOB,
            &CancelJobRequest {
                job_id: "fw-update-42".into(),
                reason_code: Some("BAD_IMAGE".into()),
                comment: None,
                force: Some(true),
            },
        )
        .unwrap();
        assert_eq!(req.path, "/jobs/fw-update-42/cancel");
        assert_eq!(req.query_string(), "force=true");
        assert_eq!(req.body.as_deref(), Some(r#"{"reasonCode":"BAD_IMAGE"}"#));
    }

    #[test]
    fn execution_path_has_two_labels() {
        let req = marshal(
            &DESCRIBE_JOB_EXECUTION,
            &DescribeJobExecutionRequest {
                job_id: "j1".into(),
                thing_name: "sensor 1".into(),
                execution_number: Some(3),
            },
        )
        .unwrap();
        assert_eq!(req.path, "/things/sensor%201/jobs/j1");
        assert_eq!(req.query_string(), "executionNumber=3");
    }

    #[test]
    fn list_jobs_enum_filters() {
        let req = marshal(
            &LIST_JOBS,
            &ListJobsRequest {
                status: Some(JobStatus::InProgress),
                target_selection: Some(TargetSelection::Snapshot),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(req.query_string(), "status=IN_PROGRESS&targetSelection=SNAPSHOT");
    }

    #[test]
    fn describe_job_decodes() {
        let resp: DescribeJobResponse = serde_json::from_str(
            r#"{"job": {
                "jobId": "j1",
                "status": "COMPLETED",
                "targetSelection": "SNAPSHOT",
                "targets": ["arn:aws:iot:us-east-1:123456789012:thing/t1"],
                "createdAt": 1700000000,
                "jobProcessDetails": {"numberOfSucceededThings": 1}
            }}"#,
        )
        .unwrap();
        let job = resp.job.unwrap();
        assert_eq!(job.status, Some(JobStatus::Completed));
        assert_eq!(job.targets.len(), 1);
        assert_eq!(
            job.job_process_details.unwrap().number_of_succeeded_things,
            Some(1)
        );
    }

    #[test]
    fn terminal_execution_states() {
        assert!(!JobExecutionStatus::Queued.is_terminal());
        assert!(!JobExecutionStatus::InProgress.is_terminal());
        assert!(JobExecutionStatus::TimedOut.is_terminal());
        assert!(JobExecutionStatus::Succeeded.is_terminal());
    }
}
