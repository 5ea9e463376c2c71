//! Thing types.

use super::{epoch_seconds, Tag};
use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Operations ──────────────────────────────────────────────────────────

pub static CREATE_THING_TYPE: OperationSpec = OperationSpec {
    name: "CreateThingType",
    method: HttpMethod::Post,
    uri: "/thing-types/{thingTypeName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DESCRIBE_THING_TYPE: OperationSpec = OperationSpec {
    name: "DescribeThingType",
    method: HttpMethod::Get,
    uri: "/thing-types/{thingTypeName}",
    query: &[],
    headers: &[],
    payload: None,
};

pub static LIST_THING_TYPES: OperationSpec = OperationSpec {
    name: "ListThingTypes",
    method: HttpMethod::Get,
    uri: "/thing-types",
    query: &[
        ("nextToken", "nextToken"),
        ("maxResults", "maxResults"),
        ("thingTypeName", "thingTypeName"),
    ],
    headers: &[],
    payload: None,
};

pub static DEPRECATE_THING_TYPE: OperationSpec = OperationSpec {
    name: "DeprecateThingType",
    method: HttpMethod::Post,
    uri: "/thing-types/{thingTypeName}/deprecate",
    query: &[],
    headers: &[],
    payload: None,
};

pub static DELETE_THING_TYPE: OperationSpec = OperationSpec {
    name: "DeleteThingType",
    method: HttpMethod::Delete,
    uri: "/thing-types/{thingTypeName}",
    query: &[],
    headers: &[],
    payload: None,
};

// ── Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingTypeProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_type_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable_attributes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingTypeMetadata {
    pub deprecated: Option<bool>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub deprecation_date: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateThingTypeRequest {
    pub thing_type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_type_properties: Option<ThingTypeProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateThingTypeResponse {
    pub thing_type_name: Option<String>,
    pub thing_type_arn: Option<String>,
    pub thing_type_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingTypeNameRequest {
    pub thing_type_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeThingTypeResponse {
    pub thing_type_name: Option<String>,
    pub thing_type_id: Option<String>,
    pub thing_type_arn: Option<String>,
    pub thing_type_properties: Option<ThingTypeProperties>,
    pub thing_type_metadata: Option<ThingTypeMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingTypesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thing_type_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThingTypeDefinition {
    pub thing_type_name: Option<String>,
    pub thing_type_arn: Option<String>,
    pub thing_type_properties: Option<ThingTypeProperties>,
    pub thing_type_metadata: Option<ThingTypeMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListThingTypesResponse {
    #[serde(default)]
    pub thing_types: Vec<ThingTypeDefinition>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeprecateThingTypeRequest {
    pub thing_type_name: String,
    /// Set to un-deprecate the type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undo_deprecate: Option<bool>,
}

// ── Facade ──────────────────────────────────────────────────────────────

impl IotClient {
    pub fn create_thing_type(
        &self,
        request: impl Into<Request<CreateThingTypeRequest>>,
    ) -> IotResult<CreateThingTypeResponse> {
        self.call(&CREATE_THING_TYPE, request.into())
    }

    pub fn describe_thing_type(
        &self,
        request: impl Into<Request<ThingTypeNameRequest>>,
    ) -> IotResult<DescribeThingTypeResponse> {
        self.call(&DESCRIBE_THING_TYPE, request.into())
    }

    pub fn list_thing_types(
        &self,
        request: impl Into<Request<ListThingTypesRequest>>,
    ) -> IotResult<ListThingTypesResponse> {
        self.call(&LIST_THING_TYPES, request.into())
    }

    pub fn deprecate_thing_type(
        &self,
        request: impl Into<Request<DeprecateThingTypeRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&DEPRECATE_THING_TYPE, request.into())
    }

    /// The type must have been deprecated for at least five minutes.
    pub fn delete_thing_type(
        &self,
        request: impl Into<Request<ThingTypeNameRequest>>,
    ) -> IotResult<()> {
        self.call_unit(&DELETE_THING_TYPE, request.into())
    }
}
