//! Protocol-neutral HTTP request and response.
//!
//! The marshaller produces an [`HttpRequest`] with a method, an encoded path,
//! query parameters, headers and an optional JSON body. The invocation
//! pipeline attaches the endpoint and clock-skew offset, the signer adds the
//! authentication headers, and the transport turns it into a real request.

use crate::error::{IotError, IotResult};
use crate::signing::uri_encode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marshalled request, before or after signing.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Scheme, host and optional base path; attached by the pipeline.
    pub endpoint: Option<String>,
    /// Already percent-encoded path, starting with `/`.
    pub path: String,
    /// Decoded query parameters, in insertion order.
    pub query: Vec<(String, String)>,
    /// Lower-case header names.
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Clock skew in seconds applied when signing.
    pub time_offset_secs: i64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            endpoint: None,
            path: path.to_string(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            time_offset_secs: 0,
        }
    }

    pub fn add_query(&mut self, name: &str, value: &str) {
        self.query.push((name.to_string(), value.to_string()));
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Encoded query string without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full request URL. Fails when no endpoint has been attached.
    pub fn url(&self) -> IotResult<String> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            IotError::client("MissingEndpoint", "No endpoint attached to the request")
        })?;
        let mut url = format!("{}{}", endpoint.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query_string());
        }
        Ok(url)
    }

    /// Value of the `host` header for this request's endpoint.
    pub fn host(&self) -> IotResult<String> {
        let url = self.url()?;
        let parsed = url::Url::parse(&url).map_err(|e| {
            IotError::client("InvalidEndpoint", &format!("Invalid URL '{}': {}", url, e))
        })?;
        let host = parsed.host_str().ok_or_else(|| {
            IotError::client("InvalidEndpoint", &format!("URL '{}' has no host", url))
        })?;
        Ok(match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }
}

/// Raw response from the service.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Lower-case header names.
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub request_id: Option<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.to_string(),
            request_id: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == "x-amzn-requestid" || name == "x-amz-request-id" {
            self.request_id = Some(value.to_string());
        }
        self.headers.insert(name, value.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_requires_endpoint() {
        let req = HttpRequest::new(HttpMethod::Get, "/things");
        assert!(req.url().is_err());
    }

    #[test]
    fn url_with_query() {
        let mut req = HttpRequest::new(HttpMethod::Get, "/things");
        req.endpoint = Some("https://iot.eu-west-1.amazonaws.com/".to_string());
        req.add_query("maxResults", "10");
        req.add_query("attributeValue", "a b/c");
        assert_eq!(
            req.url().unwrap(),
            "https://iot.eu-west-1.amazonaws.com/things?maxResults=10&attributeValue=a%20b%2Fc"
        );
    }

    #[test]
    fn host_keeps_non_default_port() {
        let mut req = HttpRequest::new(HttpMethod::Get, "/things");
        req.endpoint = Some("http://localhost:4566".to_string());
        assert_eq!(req.host().unwrap(), "localhost:4566");

        req.endpoint = Some("https://iot.us-east-1.amazonaws.com".to_string());
        assert_eq!(req.host().unwrap(), "iot.us-east-1.amazonaws.com");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let mut req = HttpRequest::new(HttpMethod::Put, "/things/t1/principals");
        req.set_header("X-Amzn-Principal", "arn:aws:iot:cert/abc");
        assert_eq!(req.header("x-amzn-principal"), Some("arn:aws:iot:cert/abc"));
    }

    #[test]
    fn response_request_id() {
        let resp = HttpResponse::new(200, "{}").with_header("x-amzn-RequestId", "rid-1");
        assert_eq!(resp.request_id.as_deref(), Some("rid-1"));
        assert!(resp.is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn methods_with_body() {
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Patch.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }
}
