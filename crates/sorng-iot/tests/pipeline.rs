mod common;

use common::{client, client_with, RecordingTransport};
use serde_json::json;
use sorng_iot::model::certificates::{
    CertificateStatus, CreateKeysAndCertificateRequest, UpdateCertificateRequest,
};
use sorng_iot::model::endpoint::{DescribeEndpointRequest, ENDPOINT_TYPE_DATA_ATS};
use sorng_iot::model::things::{
    DescribeThingRequest, ListThingsRequest, ThingPrincipalRequest,
};
use sorng_iot::{
    ClientConfig, Credentials, HttpMethod, HttpResponse, InMemoryMetricsCollector, IotClient,
    IotErrorKind, MetricField, Request,
};
use std::sync::Arc;

fn describe(name: &str) -> DescribeThingRequest {
    DescribeThingRequest {
        thing_name: name.to_string(),
    }
}

#[test]
fn success_body_maps_onto_result_fields() {
    let body = json!({
        "defaultClientId": "sensor-1",
        "thingName": "sensor-1",
        "thingId": "8f2a1c",
        "thingArn": "arn:aws:iot:us-west-2:123456789012:thing/sensor-1",
        "thingTypeName": "thermostat",
        "attributes": { "room": "lab", "floor": "2" },
        "version": 7,
        "billingGroupName": "lab-devices"
    });
    let transport = RecordingTransport::replying(200, &body.to_string());
    let client = client(transport.clone());

    let thing = client.describe_thing(describe("sensor-1")).unwrap();

    assert_eq!(thing.default_client_id.as_deref(), Some("sensor-1"));
    assert_eq!(thing.thing_name.as_deref(), Some("sensor-1"));
    assert_eq!(thing.thing_id.as_deref(), Some("8f2a1c"));
    assert_eq!(
        thing.thing_arn.as_deref(),
        Some("arn:aws:iot:us-west-2:123456789012:thing/sensor-1")
    );
    assert_eq!(thing.thing_type_name.as_deref(), Some("thermostat"));
    assert_eq!(thing.version, Some(7));
    assert_eq!(thing.billing_group_name.as_deref(), Some("lab-devices"));
    let attrs = thing.attributes.unwrap();
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs["floor"], "2");

    let sent = transport.last_request();
    assert_eq!(sent.method, HttpMethod::Get);
    assert_eq!(sent.path, "/things/sensor-1");
    assert!(sent.body.is_none());
}

#[test]
fn describe_missing_thing_is_resource_not_found() {
    let transport = RecordingTransport::new();
    transport.push(
        HttpResponse::new(
            404,
            r#"{"message":"Thing ghost cannot be found.","__type":"ResourceNotFoundException"}"#,
        )
        .with_header("x-amzn-RequestId", "5f0c2e8a-1111-2222-3333-444455556666")
        .with_header(
            "x-amzn-ErrorType",
            "ResourceNotFoundException:http://internal.amazon.com/coral/com.amazonaws.iot/",
        ),
    );
    let client = client(transport);

    let err = client.describe_thing(describe("ghost")).unwrap_err();

    assert!(err.is(IotErrorKind::ResourceNotFound));
    assert_eq!(err.code, "ResourceNotFoundException");
    assert_eq!(err.status_code, 404);
    assert_eq!(err.message, "Thing ghost cannot be found.");
    assert_eq!(
        err.request_id.as_deref(),
        Some("5f0c2e8a-1111-2222-3333-444455556666")
    );
    assert_eq!(err.operation.as_deref(), Some("DescribeThing"));
    assert!(!err.retryable);
}

#[test]
fn known_and_unknown_service_codes() {
    let cases = [
        ("VersionConflictException", 409, IotErrorKind::VersionConflict),
        ("DeleteConflictException", 409, IotErrorKind::DeleteConflict),
        ("ThrottlingException", 429, IotErrorKind::Throttling),
        ("UnauthorizedException", 401, IotErrorKind::Unauthorized),
        ("CertificateStateException", 406, IotErrorKind::CertificateState),
        ("BrandNewException", 400, IotErrorKind::Unknown),
    ];

    for (code, status, kind) in cases {
        let body = json!({ "__type": format!("com.amazonaws.iot#{}", code), "message": "nope" });
        let transport = RecordingTransport::replying(status, &body.to_string());
        let client = client(transport);

        let err = client.describe_thing(describe("t1")).unwrap_err();
        assert_eq!(err.kind, kind, "{}", code);
        assert_eq!(err.code, code);
        assert_eq!(err.status_code, status);
    }
}

#[test]
fn override_credentials_sign_the_request() {
    let transport = RecordingTransport::replying(200, "{}");
    let client = client(transport.clone());

    client.describe_thing(describe("t1")).unwrap();
    let default_auth = transport.last_request().header("authorization").unwrap().to_string();
    assert!(default_auth.contains("Credential=AKIDEXAMPLE/20240520/us-west-2/iot/aws4_request"));

    let override_creds =
        Credentials::new_temporary("ASIAOVERRIDE", "override-secret", "session-token-1", None);
    client
        .describe_thing(Request::new(describe("t1")).with_credentials(override_creds))
        .unwrap();

    let sent = transport.last_request();
    let auth = sent.header("authorization").unwrap();
    assert!(auth.contains("Credential=ASIAOVERRIDE/20240520/us-west-2/iot/aws4_request"));
    assert!(!auth.contains("AKIDEXAMPLE"));
    assert_eq!(sent.header("x-amz-security-token"), Some("session-token-1"));
    assert!(auth.contains("x-amz-security-token"));
}

#[test]
fn identical_calls_give_identical_results() {
    let body = json!({
        "things": [
            { "thingName": "a", "version": 1 },
            { "thingName": "b", "attributes": { "k": "v" }, "version": 3 }
        ],
        "nextToken": "page-2"
    });
    let transport = RecordingTransport::replying(200, &body.to_string());
    let client = client(transport.clone());

    let input = ListThingsRequest {
        max_results: Some(2),
        ..Default::default()
    };
    let first = client.list_things(input.clone()).unwrap();
    let second = client.list_things(input).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.things.len(), 2);
    assert_eq!(first.next_token.as_deref(), Some("page-2"));

    let sent = transport.requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].url().unwrap(), sent[1].url().unwrap());
    assert_eq!(sent[0].header("authorization"), sent[1].header("authorization"));
    assert_ne!(
        sent[0].header("amz-sdk-invocation-id"),
        sent[1].header("amz-sdk-invocation-id")
    );
}

#[test]
fn every_request_carries_endpoint_and_skew() {
    let transport = RecordingTransport::replying(200, "{}");
    let config = ClientConfig {
        endpoint_url: Some("http://localhost:4566/".to_string()),
        time_offset_secs: -300,
        ..ClientConfig::for_region("eu-central-1")
    };
    let client = client_with(config, transport.clone());

    client.describe_thing(describe("t1")).unwrap();
    client
        .attach_thing_principal(ThingPrincipalRequest {
            thing_name: "t1".into(),
            principal: "arn:aws:iot:eu-central-1:123456789012:cert/abc".into(),
        })
        .unwrap();
    client
        .describe_endpoint(DescribeEndpointRequest::of_type(ENDPOINT_TYPE_DATA_ATS))
        .unwrap();
    client
        .create_keys_and_certificate(CreateKeysAndCertificateRequest {
            set_as_active: Some(true),
        })
        .unwrap();

    let sent = transport.requests();
    assert_eq!(sent.len(), 4);
    for req in &sent {
        assert_eq!(req.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(req.time_offset_secs, -300);
        assert_eq!(req.header("host"), Some("localhost:4566"));
        // Local clock is 08:30:00, five minutes behind the service.
        assert_eq!(req.header("x-amz-date"), Some("20240520T083500Z"));
        assert!(req
            .header("authorization")
            .unwrap()
            .contains("/eu-central-1/iot/aws4_request"));
    }
    assert_eq!(
        sent[2].url().unwrap(),
        "http://localhost:4566/endpoint?endpointType=iot%3AData-ATS"
    );
}

#[test]
fn write_operations_send_json() {
    let transport = RecordingTransport::replying(200, "");
    let client = client(transport.clone());

    client
        .update_certificate(UpdateCertificateRequest {
            certificate_id: "c0ffee".into(),
            new_status: CertificateStatus::Inactive,
        })
        .unwrap();

    let sent = transport.last_request();
    assert_eq!(sent.method, HttpMethod::Put);
    assert_eq!(
        sent.url().unwrap(),
        "https://iot.us-west-2.amazonaws.com/certificates/c0ffee?newStatus=INACTIVE"
    );
    assert_eq!(sent.header("content-type"), Some("application/json"));
    assert_eq!(sent.body.as_deref(), Some("{}"));
    let signed = sent.header("authorization").unwrap();
    assert!(signed.contains("SignedHeaders=amz-sdk-invocation-id;content-type;host;x-amz-date"));
}

#[test]
fn unparseable_success_body_is_client_error() {
    let transport = RecordingTransport::replying(200, "<html>gateway</html>");
    let client = client(transport);

    let err = client.describe_thing(describe("t1")).unwrap_err();
    assert_eq!(err.kind, IotErrorKind::Client);
    assert_eq!(err.code, "ParseError");
}

#[test]
fn metrics_reach_the_collector() {
    let transport = RecordingTransport::new();
    transport.push(HttpResponse::new(200, r#"{"thingName":"t1"}"#));
    transport.push(HttpResponse::new(
        429,
        r#"{"__type":"ThrottlingException","message":"Rate exceeded"}"#,
    ));
    let collector = Arc::new(InMemoryMetricsCollector::new());
    let client = IotClient::builder(ClientConfig::default())
        .credentials(common::test_credentials())
        .transport(transport)
        .metrics_collector(collector.clone())
        .build()
        .unwrap();

    client.describe_thing(describe("t1")).unwrap();
    let err = client.describe_thing(describe("t1")).unwrap_err();
    assert!(err.retryable);

    let entries = collector.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].status_code, Some(200));
    assert_eq!(entries[0].error_code, None);
    assert_eq!(entries[1].status_code, Some(429));
    assert_eq!(entries[1].error_code.as_deref(), Some("ThrottlingException"));
    assert_ne!(entries[0].invocation_id, entries[1].invocation_id);
    assert!(entries[1].timing(MetricField::ResponseUnmarshallTime).is_some());
}

#[test]
fn catalog_is_introspectable() {
    let ops = IotClient::operations();
    assert!(ops.iter().any(|op| op.name == "ListAuditFindings"));
    let describe = IotClient::operation("DescribeThing").unwrap();
    assert_eq!(describe.method, HttpMethod::Get);
    assert_eq!(describe.uri, "/things/{thingName}");
}
