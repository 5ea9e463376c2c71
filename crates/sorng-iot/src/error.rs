//! AWS IoT error types.
//!
//! Errors fall in two families. Client-side errors are produced locally
//! (marshalling, credential resolution, signing, transport failures, body
//! parse failures). Service-side errors come back from AWS IoT as a
//! non-2xx status with a REST-JSON error body; the error code is mapped onto
//! one of the known [`IotErrorKind`]s, or [`IotErrorKind::Unknown`] when the
//! code is not in the table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category of an [`IotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IotErrorKind {
    CertificateConflict,
    CertificateState,
    CertificateValidation,
    Conflict,
    ConflictingResourceUpdate,
    DeleteConflict,
    IndexNotReady,
    Internal,
    InternalFailure,
    InternalServer,
    InvalidAggregation,
    InvalidQuery,
    InvalidRequest,
    InvalidResponse,
    InvalidStateTransition,
    LimitExceeded,
    MalformedPolicy,
    NotConfigured,
    RegistrationCodeValidation,
    ResourceAlreadyExists,
    ResourceNotFound,
    ResourceRegistrationFailure,
    ServiceUnavailable,
    SqlParse,
    TaskAlreadyExists,
    Throttling,
    TransferAlreadyCompleted,
    TransferConflict,
    Unauthorized,
    VersionConflict,
    VersionsLimitExceeded,
    /// Local failure before or while talking to the service.
    Client,
    /// The service returned an error code this client does not know.
    Unknown,
}

/// Service error codes and the kind each one maps to.
const SERVICE_CODES: &[(&str, IotErrorKind)] = &[
    ("CertificateConflictException", IotErrorKind::CertificateConflict),
    ("CertificateStateException", IotErrorKind::CertificateState),
    ("CertificateValidationException", IotErrorKind::CertificateValidation),
    ("ConflictException", IotErrorKind::Conflict),
    ("ConflictingResourceUpdateException", IotErrorKind::ConflictingResourceUpdate),
    ("DeleteConflictException", IotErrorKind::DeleteConflict),
    ("IndexNotReadyException", IotErrorKind::IndexNotReady),
    ("InternalException", IotErrorKind::Internal),
    ("InternalFailureException", IotErrorKind::InternalFailure),
    ("InternalServerException", IotErrorKind::InternalServer),
    ("InvalidAggregationException", IotErrorKind::InvalidAggregation),
    ("InvalidQueryException", IotErrorKind::InvalidQuery),
    ("InvalidRequestException", IotErrorKind::InvalidRequest),
    ("InvalidResponseException", IotErrorKind::InvalidResponse),
    ("InvalidStateTransitionException", IotErrorKind::InvalidStateTransition),
    ("LimitExceededException", IotErrorKind::LimitExceeded),
    ("MalformedPolicyException", IotErrorKind::MalformedPolicy),
    ("NotConfiguredException", IotErrorKind::NotConfigured),
    ("RegistrationCodeValidationException", IotErrorKind::RegistrationCodeValidation),
    ("ResourceAlreadyExistsException", IotErrorKind::ResourceAlreadyExists),
    ("ResourceNotFoundException", IotErrorKind::ResourceNotFound),
    ("ResourceRegistrationFailureException", IotErrorKind::ResourceRegistrationFailure),
    ("ServiceUnavailableException", IotErrorKind::ServiceUnavailable),
    ("SqlParseException", IotErrorKind::SqlParse),
    ("TaskAlreadyExistsException", IotErrorKind::TaskAlreadyExists),
    ("ThrottlingException", IotErrorKind::Throttling),
    ("TransferAlreadyCompletedException", IotErrorKind::TransferAlreadyCompleted),
    ("TransferConflictException", IotErrorKind::TransferConflict),
    ("UnauthorizedException", IotErrorKind::Unauthorized),
    ("VersionConflictException", IotErrorKind::VersionConflict),
    ("VersionsLimitExceededException", IotErrorKind::VersionsLimitExceeded),
];

impl IotErrorKind {
    /// Map a service error code onto a kind. Unknown codes map to [`Self::Unknown`].
    pub fn from_code(code: &str) -> Self {
        SERVICE_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Unknown)
    }

    /// Kind implied by an HTTP status when the service sent no error code.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            400 => Self::InvalidRequest,
            401 | 403 => Self::Unauthorized,
            404 => Self::ResourceNotFound,
            409 => Self::Conflict,
            429 => Self::Throttling,
            500 => Self::InternalFailure,
            503 => Self::ServiceUnavailable,
            _ => Self::Unknown,
        }
    }

    /// The canonical service code for this kind, if it has one.
    pub fn code(self) -> Option<&'static str> {
        SERVICE_CODES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(code, _)| *code)
    }

    /// Whether errors of this kind are worth retrying.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::Throttling
                | Self::Internal
                | Self::InternalFailure
                | Self::InternalServer
                | Self::ServiceUnavailable
                | Self::IndexNotReady
        )
    }
}

impl fmt::Display for IotErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => f.write_str("ClientError"),
            Self::Unknown => f.write_str("UnknownError"),
            kind => f.write_str(kind.code().unwrap_or("UnknownError")),
        }
    }
}

/// Top-level error type for all AWS IoT operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IotError {
    /// Error category.
    pub kind: IotErrorKind,
    /// The raw error code (service code, or a local code such as "ParseError").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status returned by the service, 0 for client-side errors.
    pub status_code: u16,
    /// AWS request ID for tracing (returned in response headers).
    pub request_id: Option<String>,
    /// The operation that failed (e.g., "DescribeThing").
    pub operation: Option<String>,
    /// Whether this error is retryable.
    pub retryable: bool,
}

impl fmt::Display for IotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == IotErrorKind::Client {
            write!(f, "AWS IoT client error [{}]: {}", self.code, self.message)?;
        } else {
            write!(
                f,
                "AWS IoT error [{}]: {} (HTTP {})",
                self.code, self.message, self.status_code
            )?;
        }
        if let Some(ref op) = self.operation {
            write!(f, " [Operation: {}]", op)?;
        }
        if let Some(ref req_id) = self.request_id {
            write!(f, " [RequestId: {}]", req_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for IotError {}

impl IotError {
    /// Create a service-side error from a code, message, and HTTP status.
    pub fn service(code: &str, message: &str, status_code: u16) -> Self {
        let kind = IotErrorKind::from_code(code);
        Self {
            kind,
            code: code.to_string(),
            message: message.to_string(),
            status_code,
            request_id: None,
            operation: None,
            retryable: Self::is_retryable(kind, status_code),
        }
    }

    /// Create a client-side error with a local code.
    pub fn client(code: &str, message: &str) -> Self {
        Self {
            kind: IotErrorKind::Client,
            code: code.to_string(),
            message: message.to_string(),
            status_code: 0,
            request_id: None,
            operation: None,
            retryable: false,
        }
    }

    /// Build a credential resolution error.
    pub fn credential_error(message: &str) -> Self {
        Self::client("CredentialError", message)
    }

    /// Build a request validation (marshalling) error.
    pub fn validation(message: &str) -> Self {
        Self::client("ValidationError", message)
    }

    /// Build a response parse error.
    pub fn parse(message: &str, status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::client("ParseError", message)
        }
    }

    /// With request ID.
    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    /// With operation name.
    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    /// Whether this error belongs to the given kind.
    pub fn is(&self, kind: IotErrorKind) -> bool {
        self.kind == kind
    }

    fn is_retryable(kind: IotErrorKind, status_code: u16) -> bool {
        matches!(status_code, 429 | 500 | 502 | 503 | 504) || kind.is_transient()
    }

    /// Parse an AWS REST-JSON error response.
    ///
    /// The code comes from the `x-amzn-ErrorType` header when present
    /// (`ResourceNotFoundException:http://internal.amazon.com/...`), else
    /// from the body:
    /// ```json
    /// {
    ///   "__type": "com.amazonaws.iot#ResourceNotFoundException",
    ///   "message": "Thing missing cannot be found."
    /// }
    /// ```
    pub fn parse_json_error(
        status_code: u16,
        headers: &BTreeMap<String, String>,
        body: &str,
    ) -> Self {
        let header_code = headers
            .get("x-amzn-errortype")
            .map(|v| v.split(':').next().unwrap_or(v).trim().to_string())
            .filter(|c| !c.is_empty());

        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();

        let body_code = parsed.as_ref().and_then(|val| {
            val.get("__type")
                .or_else(|| val.get("code"))
                .or_else(|| val.get("Code"))
                .and_then(|v| v.as_str())
                .map(|s| s.rsplit('#').next().unwrap_or(s).to_string())
        });

        let message = parsed
            .as_ref()
            .and_then(|val| {
                val.get("message")
                    .or_else(|| val.get("Message"))
                    .or_else(|| val.get("errorMessage"))
                    .and_then(|v| v.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {} from AWS IoT", status_code)
                } else {
                    body.chars().take(200).collect()
                }
            });

        match header_code.or(body_code) {
            Some(code) => Self::service(&code, &message, status_code),
            None => {
                let kind = IotErrorKind::from_status(status_code);
                let mut err = Self::service(&kind.to_string(), &message, status_code);
                err.kind = kind;
                err
            }
        }
    }
}

impl From<reqwest::Error> for IotError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            retryable: err.is_timeout() || err.is_connect(),
            ..Self::client("HttpError", &err.to_string())
        }
    }
}

impl From<serde_json::Error> for IotError {
    fn from(err: serde_json::Error) -> Self {
        Self::client("SerializationError", &err.to_string())
    }
}

/// Convenience result type for AWS IoT operations.
pub type IotResult<T> = Result<T, IotError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn no_headers() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn error_display() {
        let err = IotError::service("ResourceNotFoundException", "Thing not found", 404);
        let s = err.to_string();
        assert!(s.contains("ResourceNotFoundException"));
        assert!(s.contains("404"));
    }

    #[test]
    fn error_display_with_request_id_and_operation() {
        let err = IotError::service("ThrottlingException", "Rate exceeded", 429)
            .with_request_id("req-abc-123".into())
            .with_operation("ListThings");
        let s = err.to_string();
        assert!(s.contains("req-abc-123"));
        assert!(s.contains("ListThings"));
    }

    #[test]
    fn client_error_display() {
        let err = IotError::credential_error("no credentials");
        assert_eq!(err.kind, IotErrorKind::Client);
        assert_eq!(err.to_string(), "AWS IoT client error [CredentialError]: no credentials");
    }

    #[test]
    fn every_known_code_maps_back() {
        for (code, kind) in SERVICE_CODES {
            assert_eq!(IotErrorKind::from_code(code), *kind);
            assert_eq!(kind.code(), Some(*code));
        }
        assert_eq!(SERVICE_CODES.len(), 31);
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(
            IotErrorKind::from_code("SomethingNewException"),
            IotErrorKind::Unknown
        );
        let err = IotError::service("SomethingNewException", "?", 400);
        assert_eq!(err.kind, IotErrorKind::Unknown);
        assert_eq!(err.code, "SomethingNewException");
    }

    #[test]
    fn parse_json_error_body_type() {
        let json = r#"{"__type":"com.amazonaws.iot#ResourceNotFoundException","message":"Thing missing cannot be found."}"#;
        let err = IotError::parse_json_error(404, &no_headers(), json);
        assert_eq!(err.kind, IotErrorKind::ResourceNotFound);
        assert_eq!(err.code, "ResourceNotFoundException");
        assert!(err.message.contains("missing"));
    }

    #[test]
    fn parse_json_error_header_wins() {
        let mut headers = no_headers();
        headers.insert(
            "x-amzn-errortype".to_string(),
            "VersionConflictException:http://internal.amazon.com/coral/com.amazonaws.iot/".to_string(),
        );
        let json = r#"{"code":"InvalidRequestException","message":"The version for thing t1 does not match"}"#;
        let err = IotError::parse_json_error(409, &headers, json);
        assert_eq!(err.kind, IotErrorKind::VersionConflict);
    }

    #[test]
    fn parse_json_error_no_code_uses_status() {
        let err = IotError::parse_json_error(429, &no_headers(), "");
        assert_eq!(err.kind, IotErrorKind::Throttling);
        assert_eq!(err.code, "ThrottlingException");
        assert!(err.retryable);

        let err = IotError::parse_json_error(418, &no_headers(), "teapot");
        assert_eq!(err.kind, IotErrorKind::Unknown);
        assert_eq!(err.message, "teapot");
    }

    #[test]
    fn retryable_throttling() {
        let err = IotError::service("ThrottlingException", "Rate exceeded", 400);
        assert!(err.retryable);
    }

    #[test]
    fn not_retryable_auth() {
        let err = IotError::service("UnauthorizedException", "Not authorized", 401);
        assert!(!err.retryable);
    }

    #[test]
    fn serde_roundtrip() {
        let err = IotError::service("DeleteConflictException", "Policy attached", 409)
            .with_request_id("r-123".into())
            .with_operation("DeletePolicy");
        let json = serde_json::to_string(&err).unwrap();
        let back: IotError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
