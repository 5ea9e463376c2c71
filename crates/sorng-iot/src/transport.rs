//! HTTP transport.
//!
//! The transport takes a signed [`HttpRequest`] and returns the raw
//! [`HttpResponse`], whatever its status. Retries for transient failures
//! happen here and nowhere else.

use crate::config::{ClientConfig, RetryConfig, RetryMode};
use crate::error::IotResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use reqwest::blocking::Client;
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Duration;

/// Sends signed requests.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> IotResult<HttpResponse>;
}

/// Blocking `reqwest` transport with exponential backoff.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    retry_config: RetryConfig,
    user_agent: String,
}

impl ReqwestTransport {
    /// Build a transport from the timeouts and retry settings in `config`.
    pub fn new(config: &ClientConfig) -> IotResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            http,
            retry_config: config.retry_config.clone(),
            user_agent: config.user_agent(),
        })
    }

    fn send_once(&self, request: &HttpRequest) -> IotResult<HttpResponse> {
        let url = request.url()?;
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut req = self.http.request(method, &url);
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req = req.header("user-agent", &self.user_agent);
        if let Some(ref body) = request.body {
            req = req.body(body.clone());
        }

        let resp = req.send()?;

        let status = resp.status().as_u16();
        let mut headers = BTreeMap::new();
        for (key, value) in resp.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_string(), v.to_string());
            }
        }
        let request_id = headers
            .get("x-amzn-requestid")
            .or_else(|| headers.get("x-amz-request-id"))
            .cloned();
        let body = resp.text()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
            request_id,
        })
    }

    /// Exponential backoff capped at `max_backoff_ms`, with full jitter
    /// except in legacy mode.
    fn calculate_backoff(&self, attempt: u32) -> u64 {
        let base = self.retry_config.initial_backoff_ms;
        let max = self.retry_config.max_backoff_ms;
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt));
        let capped = exponential.min(max);

        match self.retry_config.mode {
            RetryMode::Adaptive | RetryMode::Standard => {
                use rand::Rng;
                rand::thread_rng().gen_range(0..=capped)
            }
            RetryMode::Legacy => capped,
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> IotResult<HttpResponse> {
        let max_attempts = self.retry_config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let last = attempt + 1 >= max_attempts;
            match self.send_once(request) {
                Ok(response) if is_retryable_status(response.status) && !last => {
                    let delay = self.calculate_backoff(attempt);
                    log::warn!(
                        "AWS IoT {} {} returned HTTP {} (attempt {}/{}) - retrying in {}ms",
                        request.method,
                        request.path,
                        response.status,
                        attempt + 1,
                        max_attempts,
                        delay
                    );
                    std::thread::sleep(Duration::from_millis(delay));
                }
                Err(e) if e.retryable && !last => {
                    let delay = self.calculate_backoff(attempt);
                    log::warn!(
                        "AWS IoT {} {} HTTP error (attempt {}/{}): {} - retrying in {}ms",
                        request.method,
                        request.path,
                        attempt + 1,
                        max_attempts,
                        e.message,
                        delay
                    );
                    std::thread::sleep(Duration::from_millis(delay));
                }
                result => return result,
            }
            attempt += 1;
        }
    }
}
