//! Operation catalog: request/response types, the static [`OperationSpec`]
//! of every operation, and the matching facade methods on
//! [`IotClient`](crate::client::IotClient).

use crate::operation::OperationSpec;
use serde::{Deserialize, Serialize};

pub mod audits;
pub mod certificates;
pub mod endpoint;
pub mod jobs;
pub mod policies;
pub mod rules;
pub mod thing_groups;
pub mod thing_types;
pub mod things;

/// Every operation in the catalog.
pub static OPERATIONS: &[&OperationSpec] = &[
    // Things
    &things::CREATE_THING,
    &things::DESCRIBE_THING,
    &things::LIST_THINGS,
    &things::UPDATE_THING,
    &things::DELETE_THING,
    &things::LIST_THING_PRINCIPALS,
    &things::ATTACH_THING_PRINCIPAL,
    &things::DETACH_THING_PRINCIPAL,
    // Thing types
    &thing_types::CREATE_THING_TYPE,
    &thing_types::DESCRIBE_THING_TYPE,
    &thing_types::LIST_THING_TYPES,
    &thing_types::DEPRECATE_THING_TYPE,
    &thing_types::DELETE_THING_TYPE,
    // Thing groups
    &thing_groups::CREATE_THING_GROUP,
    &thing_groups::DESCRIBE_THING_GROUP,
    &thing_groups::LIST_THING_GROUPS,
    &thing_groups::DELETE_THING_GROUP,
    &thing_groups::ADD_THING_TO_THING_GROUP,
    &thing_groups::REMOVE_THING_FROM_THING_GROUP,
    // Certificates
    &certificates::CREATE_KEYS_AND_CERTIFICATE,
    &certificates::CREATE_CERTIFICATE_FROM_CSR,
    &certificates::REGISTER_CERTIFICATE,
    &certificates::DESCRIBE_CERTIFICATE,
    &certificates::LIST_CERTIFICATES,
    &certificates::UPDATE_CERTIFICATE,
    &certificates::DELETE_CERTIFICATE,
    // Policies
    &policies::CREATE_POLICY,
    &policies::GET_POLICY,
    &policies::LIST_POLICIES,
    &policies::DELETE_POLICY,
    &policies::ATTACH_POLICY,
    &policies::DETACH_POLICY,
    &policies::CREATE_POLICY_VERSION,
    &policies::LIST_POLICY_VERSIONS,
    // Jobs
    &jobs::CREATE_JOB,
    &jobs::DESCRIBE_JOB,
    &jobs::LIST_JOBS,
    &jobs::CANCEL_JOB,
    &jobs::DELETE_JOB,
    &jobs::DESCRIBE_JOB_EXECUTION,
    &jobs::LIST_JOB_EXECUTIONS_FOR_JOB,
    // Audits
    &audits::START_ON_DEMAND_AUDIT_TASK,
    &audits::DESCRIBE_AUDIT_TASK,
    &audits::LIST_AUDIT_TASKS,
    &audits::CANCEL_AUDIT_TASK,
    &audits::DESCRIBE_ACCOUNT_AUDIT_CONFIGURATION,
    &audits::UPDATE_ACCOUNT_AUDIT_CONFIGURATION,
    &audits::LIST_AUDIT_FINDINGS,
    // Topic rules
    &rules::CREATE_TOPIC_RULE,
    &rules::GET_TOPIC_RULE,
    &rules::LIST_TOPIC_RULES,
    &rules::DELETE_TOPIC_RULE,
    &rules::ENABLE_TOPIC_RULE,
    &rules::DISABLE_TOPIC_RULE,
    // Endpoint
    &endpoint::DESCRIBE_ENDPOINT,
];

// ── Shared types ────────────────────────────────────────────────────────

/// Resource tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.to_string()),
        }
    }
}

/// Serde adapter for timestamps sent as fractional epoch seconds.
pub mod epoch_seconds {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_f64(t.timestamp_millis() as f64 / 1000.0),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let secs = Option::<f64>::deserialize(deserializer)?;
        secs.map(|secs| {
            let millis = (secs * 1000.0).round() as i64;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| D::Error::custom(format!("timestamp {} out of range", secs)))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashSet;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamped {
        #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn epoch_seconds_fractional() {
        let s: Stamped = serde_json::from_str(r#"{"at":1.7093e9}"#).unwrap();
        assert_eq!(s.at, Some(Utc.timestamp_opt(1_709_300_000, 0).unwrap()));

        let s: Stamped = serde_json::from_str(r#"{"at":1709300000.25}"#).unwrap();
        assert_eq!(s.at.unwrap().timestamp_millis(), 1_709_300_000_250);

        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"at":1709300000.25}"#);
    }

    #[test]
    fn epoch_seconds_absent() {
        let s: Stamped = serde_json::from_str("{}").unwrap();
        assert_eq!(s.at, None);
        assert_eq!(serde_json::to_string(&s).unwrap(), "{}");
    }

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<&str> = OPERATIONS.iter().map(|op| op.name).collect();
        assert_eq!(names.len(), OPERATIONS.len());
        assert_eq!(OPERATIONS.len(), 55);
    }

    #[test]
    fn catalog_bindings_are_well_formed() {
        for op in OPERATIONS {
            assert!(op.uri.starts_with('/'), "{} uri", op.name);
            assert_eq!(
                op.uri.matches('{').count(),
                op.uri.matches('}').count(),
                "{} uri",
                op.name
            );
            for label in op.labels() {
                assert!(
                    !op.query.iter().any(|(_, m)| *m == label),
                    "{}: {} bound twice",
                    op.name,
                    label
                );
            }
        }
    }

    #[test]
    fn tag_wire_shape() {
        let json = serde_json::to_string(&Tag::new("env", "prod")).unwrap();
        assert_eq!(json, r#"{"Key":"env","Value":"prod"}"#);
    }
}
