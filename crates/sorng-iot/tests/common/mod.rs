use chrono::{TimeZone, Utc};
use sorng_iot::{
    ClientConfig, Credentials, FixedClock, HttpRequest, HttpResponse, IotClient, IotResult,
    Transport,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that records every request and replays queued responses.
/// When the queue runs dry the last response is repeated.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    last: Mutex<Option<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(status: u16, body: &str) -> Arc<Self> {
        let transport = Self::new();
        transport.push(HttpResponse::new(status, body));
        transport
    }

    pub fn push(&self, response: HttpResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("no request reached the transport")
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> IotResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(response) = next {
            *last = Some(response);
        }
        Ok(last.clone().unwrap_or_else(|| HttpResponse::new(200, "{}")))
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
}

/// Client on a fixed clock with static credentials, talking to `transport`.
pub fn client_with(config: ClientConfig, transport: Arc<RecordingTransport>) -> IotClient {
    IotClient::builder(config)
        .credentials(test_credentials())
        .transport(transport)
        .clock(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 0).unwrap(),
        )))
        .build()
        .unwrap()
}

pub fn client(transport: Arc<RecordingTransport>) -> IotClient {
    client_with(ClientConfig::for_region("us-west-2"), transport)
}
