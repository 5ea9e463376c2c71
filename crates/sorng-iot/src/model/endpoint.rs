//! Account-specific data-plane endpoints.

use crate::client::IotClient;
use crate::error::IotResult;
use crate::http::HttpMethod;
use crate::operation::{OperationSpec, Request};
use serde::{Deserialize, Serialize};

pub static DESCRIBE_ENDPOINT: OperationSpec = OperationSpec {
    name: "DescribeEndpoint",
    method: HttpMethod::Get,
    uri: "/endpoint",
    query: &[("endpointType", "endpointType")],
    headers: &[],
    payload: None,
};

/// MQTT data endpoint with an Amazon Trust Services certificate.
pub const ENDPOINT_TYPE_DATA_ATS: &str = "iot:Data-ATS";
/// Legacy VeriSign-signed data endpoint.
pub const ENDPOINT_TYPE_DATA: &str = "iot:Data";
pub const ENDPOINT_TYPE_CREDENTIAL_PROVIDER: &str = "iot:CredentialProvider";
pub const ENDPOINT_TYPE_JOBS: &str = "iot:Jobs";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeEndpointRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<String>,
}

impl DescribeEndpointRequest {
    pub fn of_type(endpoint_type: &str) -> Self {
        Self {
            endpoint_type: Some(endpoint_type.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeEndpointResponse {
    /// e.g. `a1b2c3d4e5f6g7-ats.iot.us-east-1.amazonaws.com`.
    pub endpoint_address: Option<String>,
}

impl IotClient {
    pub fn describe_endpoint(
        &self,
        request: impl Into<Request<DescribeEndpointRequest>>,
    ) -> IotResult<DescribeEndpointResponse> {
        self.call(&DESCRIBE_ENDPOINT, request.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::marshal;

    #[test]
    fn endpoint_type_query() {
        let req = marshal(
            &DESCRIBE_ENDPOINT,
            &DescribeEndpointRequest::of_type(ENDPOINT_TYPE_DATA_ATS),
        )
        .unwrap();
        assert_eq!(req.path, "/endpoint");
        assert_eq!(req.query_string(), "endpointType=iot%3AData-ATS");
        assert!(req.body.is_none());
    }
}
