//! Things: the registry entries that represent devices.
//!
//! Reference: <https://docs.aws.amazon.com/iot/latest/apireference/API_Operations_AWS_IoT.html>

use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Operations ──────────────────────────────────────────────────────────

pub static CREATE_THING: OperationSpec = OperationSpec {
    name: "CreateThing",
    method: HttpMethod::Post,
    uri: "/things/{thingName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DESCRIBE_THING: OperationSpec = OperationSpec {
    name: "DescribeThing",
    method: HttpMethod::Get,
    uri: "/things/{thingName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_THINGS: OperationSpec = OperationSpec {
    name: "ListThings",
    method: HttpMethod::Get,
    uri: "/things",
    query: &[
        ("nextToken", "nextToken"),
        ("maxResults", "maxResults"),
        ("attributeName", "attributeName"),
        ("attributeValue", "attributeValue"),
        ("thingTypeName", "thingTypeName"),
        ("usePrefixAttributeValue", "usePrefixAttributeValue"),
    ],
    headers: &[],
    payload: None,
};

pub static UPDATE_THING: OperationSpec = OperationSpec {
    name: "UpdateThing",
    method: HttpMethod::Patch,
    uri: "/things/{thingName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DELETE_THING: OperationSpec = OperationSpec {
    name: "DeleteThing",
    method: HttpMethod::Delete,
    uri: "/things/{thingName}",
    query: &[("expectedVersion", "expectedVersion")],
    headers: &[],
    payload: None,
};

pub static LIST_THING_PRINCIPALS: OperationSpec = OperationSpec {
    name: "ListThingPrincipals",
    method: HttpMethod::Get,
    uri: "/things/{thingName}/principals",
    query: &[("nextToken", "nextToken"), ("maxResults", "maxResults")],
    headers: &[],
    payload: None,
};

pub static ATTACH_THING_PRINCIPAL: OperationSpec = OperationSpec {
    name: "AttachThingPrincipal",
    method: HttpMethod::Put,
    uri: "/things/{thingName}/principals",
    query: &[],
    headers: &[("x-amzn-principal", "principal")],
    payload: None,
};

pub static DETACH_THING_PRINCIPAL: OperationSpec = OperationSpec {
    name: "DetachThingPrincipal",
    method: HttpMethod::Delete,
    uri: "/things/{thingName}/principals",
    query: &[],
    headers: &[("x-amzn-principal", "principal")],
    payload: None,
};

// ── Types ───────────────────────────────────────────────────────────────

/// Searchable attributes of a thing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
    /// Merge with the stored attributes instead of replacing them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
}

impl AttributePayload {
    pub fn new(attributes: HashMap<String, String>) -> Self {
        Self {
            attributes: Some(attributes),
            merge: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateThingRequest {
    pub thing_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_payload: Option<AttributePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_group_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateThingResponse {
    pub thing_name: Option<String>,
    pub thing_arn: Option<String>,
    pub thing_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeThingRequest {
    pub thing_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeThingResponse {
    pub default_client_id: Option<String>,
    pub thing_name: Option<String>,
    pub thing_id: Option<String>,
    pub thing_arn: Option<String>,
    pub thing_type_name: Option<String>,
    pub attributes: Option<HashMap<String, String>>,
    pub version: Option<i64>,
    pub billing_group_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_prefix_attribute_value: Option<bool>,
}

/// Summary of a thing as returned by `ListThings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingAttribute {
    pub thing_name: Option<String>,
    pub thing_type_name: Option<String>,
    pub thing_arn: Option<String>,
    pub attributes: Option<HashMap<String, String>>,
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingsResponse {
    #[serde(default)]
    pub things: Vec<ThingAttribute>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThingRequest {
    pub thing_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_payload: Option<AttributePayload>,
    /// Optimistic-lock version; the update fails on mismatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_thing_type: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteThingRequest {
    pub thing_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingPrincipalsRequest {
    pub thing_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingPrincipalsResponse {
    /// Certificate ARNs or Cognito identity IDs.
    #[serde(default)]
    pub principals: Vec<String>,
    pub next_token: Option<String>,
}

/// Input of `AttachThingPrincipal` and `DetachThingPrincipal`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingPrincipalRequest {
    pub thing_name: String,
    /// Certificate ARN or Cognito identity ID; sent as `x-amzn-principal`.
    pub principal: String,
}

// ── Facade ──────────────────────────────────────────────────────────────

impl IotClient {
    pub fn create_thing(
        &self,
        request: impl Into<Request<CreateThingRequest>>,
    ) -> IotResult<CreateThingResponse> {
        self.call(&CREATE_THING, request.into())
    }

    pub fn describe_thing(
        &self,
        request: impl Into<Request<DescribeThingRequest>>,
    ) -> IotResult<DescribeThingResponse> {
        self.call(&DESCRIBE_THING, request.into())
    }

    /// One page of things; follow `next_token` for more.
    pub fn list_things(
        &self,
        request: impl Into<Request<ListThingsRequest>>,
    ) -> IotResult<ListThingsResponse> {
        self.call(&LIST_THINGS, request.into())
    }

    pub fn update_thing(&self, request: impl Into<Request<UpdateThingRequest>>) -> IotResult<()> {
        self.call_unit(&UPDATE_THING, request.into())
    }

    pub fn delete_thing(&self, request: impl Into<Request<DeleteThingRequest>>) -> IotResult<()> {
        self.call_unit(&DELETE_THING, request.into())
    }

    pub fn list_thing_principals(
        &self,
        request: impl Into<Request<ListThingPrincipalsRequest>>,
    ) -> IotResult<ListThingPrincipalsResponse> {
        self.call(&LIST_THING_PRINCIPALS, request.into())
    }

    pub fn attach_thing_principal(
        &self,
        request: impl Into<Request<ThingPrincipalRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&ATTACH_THING_PRINCIPAL, request.into())
    }

    pub fn detach_thing_principal(
        &self,
        request: impl Into<Request<ThingPrincipalRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&DETACH_THING_PRINCIPAL, request.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::marshal;
    use serde_json::{json, Value};

    #[test]
    fn create_thing_body_excludes_label() {
        let mut attrs = HashMap::new();
        attrs.insert("room".to_string(), "lab".to_string());
        let req = marshal(
            &CREATE_THING,
            &CreateThingRequest {
                thing_name: "sensor-1".into(),
                thing_type_name: Some("thermo".into()),
                attribute_payload: Some(AttributePayload::new(attrs)),
                billing_group_name: None,
            },
        )
        .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/things/sensor-1");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "thingTypeName": "thermo",
                "attributePayload": { "attributes": { "room": "lab" } }
            })
        );
    }

    #[test]
    fn list_things_uses_query() {
        let req = marshal(
            &LIST_THINGS,
            &ListThingsRequest {
                max_results: Some(50),
                thing_type_name: Some("thermo".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(req.path, "/things");
        assert_eq!(req.query_string(), "maxResults=50&thingTypeName=thermo");
        assert!(req.body.is_none());
    }

    #[test]
    fn delete_thing_expected_version() {
        let req = marshal(
            &DELETE_THING,
            &DeleteThingRequest {
                thing_name: "t1".into(),
                expected_version: Some(4),
            },
        )
        .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.query_string(), "expectedVersion=4");
    }

    #[test]
    fn principal_goes_in_header() {
        let req = marshal(
            &ATTACH_THING_PRINCIPAL,
            &ThingPrincipalRequest {
                thing_name: "t1".into(),
                principal: "arn:aws:iot:us-east-1:123456789012:cert/abc".into(),
            },
        )
        .unwrap();
        assert_eq!(req.path, "/things/t1/principals");
        assert_eq!(
            req.header("x-amzn-principal"),
            Some("arn:aws:iot:us-east-1:123456789012:cert/abc")
        );
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn describe_thing_response_decodes() {
        let resp: DescribeThingResponse = serde_json::from_str(
            r#"{
                "defaultClientId": "sensor-1",
                "thingName": "sensor-1",
                "thingId": "3f1c",
                "thingArn": "arn:aws:iot:us-east-1:123456789012:thing/sensor-1",
                "thingTypeName": "thermo",
                "attributes": {"room": "lab"},
                "version": 2
            }"#,
        )
        .unwrap();
        assert_eq!(resp.thing_id.as_deref(), Some("3f1c"));
        assert_eq!(resp.version, Some(2));
        assert_eq!(resp.billing_group_name, None);
    }
}
