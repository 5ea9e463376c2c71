//! Operation schema and the generic request marshaller.
//!
//! Every remote operation is described by a static [`OperationSpec`]: HTTP
//! method, URI template and the bindings that move input members into the
//! path, query string, headers or body. [`marshal`] turns any serde input
//! into an [`HttpRequest`] using that description, so the per-operation code
//! is only the `OperationSpec` static and the input/output types.

use crate::credentials::Credentials;
use crate::error::{IotError, IotResult};
use crate::http::{HttpMethod, HttpRequest};
use crate::signing::uri_encode;
use serde::Serialize;
use serde_json::{Map, Value};

/// Static description of one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// Operation name as the service knows it (e.g. "DescribeThing").
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path template; `{member}` segments are filled from the input.
    pub uri: &'static str,
    /// `(query parameter, input member)` pairs.
    pub query: &'static [(&'static str, &'static str)],
    /// `(header name, input member)` pairs.
    pub headers: &'static [(&'static str, &'static str)],
    /// Input member sent as the whole body, if the operation has one.
    pub payload: Option<&'static str>,
}

impl OperationSpec {
    /// Names of the `{label}` segments in the URI template.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        let mut rest = self.uri;
        while let Some(start) = rest.find('{') {
            match rest[start..].find('}') {
                Some(end) => {
                    labels.push(&rest[start + 1..start + end]);
                    rest = &rest[start + end + 1..];
                }
                None => break,
            }
        }
        labels
    }
}

// ── Request envelope ────────────────────────────────────────────────────

/// Input of a facade call: the operation's request object plus optional
/// credentials that take precedence over the client's provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<T> {
    pub params: T,
    pub credentials: Option<Credentials>,
}

impl<T> Request<T> {
    pub fn new(params: T) -> Self {
        Self {
            params,
            credentials: None,
        }
    }

    /// Sign this call with `credentials` instead of the client's provider.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

impl<T> From<T> for Request<T> {
    fn from(params: T) -> Self {
        Self::new(params)
    }
}

// ── Marshalling ─────────────────────────────────────────────────────────

/// Build the HTTP request for `spec` from `input`.
///
/// Null members are dropped. Label members fill the URI template, query and
/// header members are moved out, and what remains becomes the JSON body (or
/// the declared payload member alone). GET/DELETE operations without a
/// payload reject unbound members, since they would otherwise be lost.
pub fn marshal<T: Serialize>(spec: &OperationSpec, input: &T) -> IotResult<HttpRequest> {
    let mut members = match serde_json::to_value(input)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(IotError::validation(&format!(
                "{} input must be an object, got {}",
                spec.name,
                json_type(&other)
            )))
        }
    };
    members.retain(|_, v| !v.is_null());

    let path = expand_uri(spec, &mut members)?;
    let mut request = HttpRequest::new(spec.method, &path);

    for (param, member) in spec.query {
        match members.remove(*member) {
            Some(Value::Array(items)) => {
                for item in &items {
                    request.add_query(param, &scalar(spec, member, item)?);
                }
            }
            Some(value) => request.add_query(param, &scalar(spec, member, &value)?),
            None => {}
        }
    }

    for (header, member) in spec.headers {
        if let Some(value) = members.remove(*member) {
            request.set_header(header, &scalar(spec, member, &value)?);
        }
    }

    let body = match spec.payload {
        Some(member) => {
            let payload = members.remove(member);
            reject_unbound(spec, &members)?;
            payload.map(|v| serde_json::to_string(&v)).transpose()?
        }
        None if spec.method.has_body() => Some(Value::Object(members).to_string()),
        None => {
            reject_unbound(spec, &members)?;
            None
        }
    };

    let body = match body {
        None if spec.method.has_body() => Some("{}".to_string()),
        body => body,
    };
    if body.is_some() {
        request.set_header("content-type", "application/json");
    }
    request.body = body;

    Ok(request)
}

fn expand_uri(spec: &OperationSpec, members: &mut Map<String, Value>) -> IotResult<String> {
    let mut path = String::with_capacity(spec.uri.len() + 32);
    let mut rest = spec.uri;

    while let Some(start) = rest.find('{') {
        path.push_str(&rest[..start]);
        let end = rest[start..].find('}').map(|i| start + i).ok_or_else(|| {
            IotError::validation(&format!(
                "{}: unterminated label in URI '{}'",
                spec.name, spec.uri
            ))
        })?;
        let label = &rest[start + 1..end];

        let value = members.remove(label).ok_or_else(|| {
            IotError::validation(&format!("{}: missing required member '{}'", spec.name, label))
        })?;
        let value = scalar(spec, label, &value)?;
        if value.is_empty() {
            return Err(IotError::validation(&format!(
                "{}: member '{}' must not be empty",
                spec.name, label
            )));
        }
        // URL parsing drops `.`/`..` segments even when percent-encoded.
        if value == "." || value == ".." {
            return Err(IotError::validation(&format!(
                "{}: member '{}' cannot be '{}'",
                spec.name, label, value
            )));
        }
        path.push_str(&uri_encode(&value));
        rest = &rest[end + 1..];
    }
    path.push_str(rest);
    Ok(path)
}

fn scalar(spec: &OperationSpec, member: &str, value: &Value) -> IotResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(IotError::validation(&format!(
            "{}: member '{}' must be a string, number or boolean, got {}",
            spec.name,
            member,
            json_type(other)
        ))),
    }
}

fn reject_unbound(spec: &OperationSpec, members: &Map<String, Value>) -> IotResult<()> {
    if members.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = members.keys().map(String::as_str).collect();
    Err(IotError::validation(&format!(
        "{}: unexpected members {}",
        spec.name,
        names.join(", ")
    )))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
