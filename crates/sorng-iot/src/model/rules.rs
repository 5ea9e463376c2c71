//! Topic rules: SQL over MQTT topics with actions on match.

use super::epoch_seconds;
use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Operations ──────────────────────────────────────────────────────────

pub static CREATE_TOPIC_RULE: OperationSpec = OperationSpec {
    name: "CreateTopicRule",
    method: HttpMethod::Post,
    uri: "/rules/{ruleName}",
    query: &[],
    headers: &[("x-amz-tagging", "tags")],
    payload: Some("topicRulePayload"),
};

pub static GET_TOPIC_RULE: OperationSpec = OperationSpec {
    name: "GetTopicRule",
    method: HttpMethod::Get,
    uri: "/rules/{ruleName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_TOPIC_RULES: OperationSpec = OperationSpec {
    name: "ListTopicRules",
    method: HttpMethod::Get,
    uri: "/rules",
    query: &[
        ("topic", "topic"),
        ("maxResults", "maxResults"),
        ("nextToken", "nextToken"),
        ("ruleDisabled", "ruleDisabled"),
    ],
    headers: &[],
    payload: None,
};

pub static DELETE_TOPIC_RULE: OperationSpec = OperationSpec {
    name: "DeleteTopicRule",
    method: HttpMethod::Delete,
    uri: "/rules/{ruleName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static ENABLE_TOPIC_RULE: OperationSpec = OperationSpec {
    name: "EnableTopicRule",
    method: HttpMethod::Post,
    uri: "/rules/{ruleName}/enable",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DISABLE_TOPIC_RULE: OperationSpec = OperationSpec {
    name: "DisableTopicRule",
    method: HttpMethod::Post,
    uri: "/rules/{ruleName}/disable",
    query: &[],
    headers: &[],
    payload: None,
};

// ── Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LambdaAction {
    pub function_arn: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnsAction {
    pub target_arn: String,
    pub role_arn: String,
    /// `RAW` or `JSON`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SqsAction {
    pub role_arn: String,
    pub queue_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_base64: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepublishAction {
    pub role_arn: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct S3Action {
    pub role_arn: String,
    pub bucket_name: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canned_acl: Option<String>,
}

/// One rule action. Set exactly one member; action kinds without a typed
/// member go in `other`, keyed by their wire name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambda: Option<LambdaAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sns: Option<SnsAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqs: Option<SqsAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub republish: Option<RepublishAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Action>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Action {
    pub fn lambda(function_arn: &str) -> Self {
        Self {
            lambda: Some(LambdaAction {
                function_arn: function_arn.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn republish(role_arn: &str, topic: &str) -> Self {
        Self {
            republish: Some(RepublishAction {
                role_arn: role_arn.to_string(),
                topic: topic.to_string(),
                qos: None,
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicRulePayload {
    /// e.g. `SELECT temp FROM 'sensors/+/telemetry' WHERE temp > 50`.
    pub sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_iot_sql_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_action: Option<Action>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRuleRequest {
    pub rule_name: String,
    pub topic_rule_payload: TopicRulePayload,
    /// URL query-string encoded tags (`k1=v1&k2=v2`), sent as `x-amz-tagging`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleNameRequest {
    pub rule_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicRule {
    pub rule_name: Option<String>,
    pub sql: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actions: Vec<Action>,
    pub rule_disabled: Option<bool>,
    pub aws_iot_sql_version: Option<String>,
    pub error_action: Option<Action>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetTopicRuleResponse {
    pub rule_arn: Option<String>,
    pub rule: Option<TopicRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListTopicRulesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_disabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicRuleListItem {
    pub rule_arn: Option<String>,
    pub rule_name: Option<String>,
    pub topic_pattern: Option<String>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub rule_disabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListTopicRulesResponse {
    #[serde(default)]
    pub rules: Vec<TopicRuleListItem>,
    pub next_token: Option<String>,
}

// ── Facade ──────────────────────────────────────────────────────────────

impl IotClient {
    pub fn create_topic_rule(
        &self,
        request: impl Into<Request<CreateTopicRuleRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&CREATE_TOPIC_RULE, request.into())
    }

    pub fn get_topic_rule(
        &self,
        request: impl Into<Request<RuleNameRequest>>,
    ) -> IotResult<GetTopicRuleResponse> {
        self.call(&GET_TOPIC_RULE, request.into())
    }

    pub fn list_topic_rules(
        &self,
        request: impl Into<Request<ListTopicRulesRequest>>,
    ) -> IotResult<ListTopicRulesResponse> {
        self.call(&LIST_TOPIC_RULES, request.into())
    }

    pub fn delete_topic_rule(&self, request: impl Into<Request<RuleNameRequest>>) -> IotResult<()> {
        self.call_unit(&DELETE_TOPIC_RULE, request.into())
    }

    pub fn enable_topic_rule(&self, request: impl Into<Request<RuleNameRequest>>) -> IotResult<()> {
        self.call_unit(&ENABLE_TOPIC_RULE, request.into())
    }

    pub fn disable_topic_rule(&self, request: impl Into<Request<RuleNameRequest>>) -> IotResult<()> {
        self.call_unit(&DISABLE_TOPIC_RULE, request.into())
    }
}
