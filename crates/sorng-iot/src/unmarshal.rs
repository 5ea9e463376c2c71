//! Response decoding.

use crate::error::{IotError, IotResult};
use crate::http::HttpResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Output of operations whose response carries no members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResponse {}

/// Decode `response` into the operation's output, or the service error it
/// carries.
pub fn unmarshal<O: DeserializeOwned>(response: &HttpResponse) -> IotResult<O> {
    if response.is_success() {
        decode_success(response)
    } else {
        Err(decode_error(response))
    }
}

/// Decode a 2xx body. An empty body decodes as `{}`.
pub fn decode_success<O: DeserializeOwned>(response: &HttpResponse) -> IotResult<O> {
    let body = if response.body.trim().is_empty() {
        "{}"
    } else {
        response.body.as_str()
    };

    serde_json::from_str(body).map_err(|e| {
        let err = IotError::parse(
            &format!("Failed to parse response body: {}", e),
            response.status,
        );
        match response.request_id {
            Some(ref id) => err.with_request_id(id.clone()),
            None => err,
        }
    })
}

/// Map a non-2xx response onto an [`IotError`].
pub fn decode_error(response: &HttpResponse) -> IotError {
    let err = IotError::parse_json_error(response.status, &response.headers, &response.body);
    match response.request_id {
        Some(ref id) => err.with_request_id(id.clone()),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IotErrorKind;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Out {
        thing_name: Option<String>,
        version: Option<i64>,
        attributes: Option<HashMap<String, String>>,
    }

    #[test]
    fn success_body_decodes() {
        let resp = HttpResponse::new(
            200,
            r#"{"thingName":"t1","version":3,"attributes":{"room":"lab"},"extra":true}"#,
        );
        let out: Out = unmarshal(&resp).unwrap();
        assert_eq!(out.thing_name.as_deref(), Some("t1"));
        assert_eq!(out.version, Some(3));
        assert_eq!(out.attributes.unwrap()["room"], "lab");
    }

    #[test]
    fn empty_body_is_empty_object() {
        let out: EmptyResponse = unmarshal(&HttpResponse::new(200, "")).unwrap();
        assert_eq!(out, EmptyResponse {});
    }

    #[test]
    fn bad_body_is_parse_error() {
        let resp = HttpResponse::new(200, "<html>").with_header("x-amzn-RequestId", "rid-9");
        let err = unmarshal::<Out>(&resp).unwrap_err();
        assert_eq!(err.kind, IotErrorKind::Client);
        assert_eq!(err.code, "ParseError");
        assert_eq!(err.status_code, 200);
        assert_eq!(err.request_id.as_deref(), Some("rid-9"));
    }

    #[test]
    fn error_response_maps_kind() {
        let resp = HttpResponse::new(
            409,
            r#"{"message":"Certificate is attached","__type":"DeleteConflictException"}"#,
        )
        .with_header("x-amzn-RequestId", "rid-1");
        let err = unmarshal::<Out>(&resp).unwrap_err();
        assert_eq!(err.kind, IotErrorKind::DeleteConflict);
        assert_eq!(err.request_id.as_deref(), Some("rid-1"));
        assert_eq!(err.message, "Certificate is attached");
    }
}
