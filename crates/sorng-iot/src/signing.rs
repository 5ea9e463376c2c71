//! AWS Signature Version 4.
//!
//! Implements the SigV4 algorithm as documented at
//! <https://docs.aws.amazon.com/general/latest/gr/sigv4_signing.html>:
//!
//! 1. Create a canonical request
//! 2. Create the string to sign
//! 3. Calculate the signing key
//! 4. Add the signature to the request
//!
//! The IoT control plane is not S3, so path segments are encoded twice in the
//! canonical URI and the payload hash is not sent as a header.

use crate::credentials::Credentials;
use crate::error::{IotError, IotResult};
use crate::http::HttpRequest;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Hash of an empty payload.
pub const EMPTY_PAYLOAD_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// RFC 3986 unreserved characters stay as-is, everything else is encoded.
const SIGV4_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// SigV4 signer bound to one set of credentials, a region, and a service.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
    region: String,
    service: String,
}

impl SigV4Signer {
    pub fn new(credentials: &Credentials, region: &str, service: &str) -> Self {
        Self {
            credentials: credentials.clone(),
            region: region.to_string(),
            service: service.to_string(),
        }
    }

    /// Sign `request` in place.
    ///
    /// The signing time is `now` minus the request's clock-skew offset. Sets
    /// `host`, `x-amz-date`, `x-amz-security-token` (temporary credentials
    /// only) and `authorization`.
    pub fn sign(&self, request: &mut HttpRequest, now: DateTime<Utc>) -> IotResult<()> {
        let timestamp = TimeDelta::try_seconds(request.time_offset_secs)
            .and_then(|offset| now.checked_sub_signed(offset))
            .ok_or_else(|| {
                IotError::client(
                    "InvalidClockSkew",
                    &format!(
                        "Clock offset of {}s cannot be applied to {}",
                        request.time_offset_secs, now
                    ),
                )
            })?;
        let date_stamp = timestamp.format("%Y%m%d").to_string();
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();

        request.headers.remove("authorization");
        let host = request.host()?;
        request.set_header("host", &host);
        request.set_header("x-amz-date", &amz_date);
        if let Some(ref token) = self.credentials.session_token {
            request.set_header("x-amz-security-token", token);
        }

        let payload_hash = sha256_hex(request.body.as_deref().unwrap_or(""));
        let (canonical_uri, canonical_querystring) = parse_url_components(&request.url()?);

        let canonical_request = self.create_canonical_request(
            request.method.as_str(),
            &canonical_uri,
            &canonical_querystring,
            &request.headers,
            &payload_hash,
        );

        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign =
            self.create_string_to_sign(&amz_date, &credential_scope, &canonical_request);

        let signing_key = self.derive_signing_key(&date_stamp);
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            self.credentials.access_key_id,
            credential_scope,
            self.signed_header_names(&request.headers),
            signature
        );
        request.set_header("authorization", &authorization);
        Ok(())
    }

    /// CanonicalRequest =
    ///   HTTPRequestMethod + '\n' +
    ///   CanonicalURI + '\n' +
    ///   CanonicalQueryString + '\n' +
    ///   CanonicalHeaders + '\n' +
    ///   SignedHeaders + '\n' +
    ///   HexEncode(Hash(RequestPayload))
    fn create_canonical_request(
        &self,
        method: &str,
        canonical_uri: &str,
        canonical_querystring: &str,
        headers: &BTreeMap<String, String>,
        payload_hash: &str,
    ) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method,
            canonical_uri,
            canonical_querystring,
            self.canonical_headers(headers),
            self.signed_header_names(headers),
            payload_hash
        )
    }

    fn create_string_to_sign(
        &self,
        amz_date: &str,
        credential_scope: &str,
        canonical_request: &str,
    ) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            credential_scope,
            sha256_hex(canonical_request)
        )
    }

    /// kSecret  = "AWS4" + SecretAccessKey
    /// kDate    = HMAC-SHA256(kSecret, Date)
    /// kRegion  = HMAC-SHA256(kDate, Region)
    /// kService = HMAC-SHA256(kRegion, Service)
    /// kSigning = HMAC-SHA256(kService, "aws4_request")
    fn derive_signing_key(&self, date_stamp: &str) -> Vec<u8> {
        let k_secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }

    /// Lower-cased, sorted, whitespace-collapsed `name:value\n` lines.
    fn canonical_headers(&self, headers: &BTreeMap<String, String>) -> String {
        let mut sorted: Vec<(String, String)> = headers
            .iter()
            .map(|(k, v)| {
                (
                    k.to_lowercase(),
                    v.split_whitespace().collect::<Vec<_>>().join(" "),
                )
            })
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        sorted
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v))
            .collect::<String>()
    }

    fn signed_header_names(&self, headers: &BTreeMap<String, String>) -> String {
        let mut names: Vec<String> = headers.keys().map(|k| k.to_lowercase()).collect();
        names.sort();
        names.join(";")
    }
}

// ── Helper functions ────────────────────────────────────────────────────

/// Compute SHA-256 hash and return hex-encoded string.
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Split a URL into (canonical_uri, canonical_querystring).
fn parse_url_components(url: &str) -> (String, String) {
    if let Ok(parsed) = url::Url::parse(url) {
        let path = if parsed.path().is_empty() {
            "/".to_string()
        } else {
            uri_encode_path(parsed.path())
        };

        let mut query_params: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query_params.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let query_string = query_params
            .iter()
            .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
            .collect::<Vec<String>>()
            .join("&");

        (path, query_string)
    } else {
        ("/".to_string(), String::new())
    }
}

/// URI-encode a string per SigV4 (RFC 3986 unreserved characters kept).
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, SIGV4_ENCODE_SET).to_string()
}

/// URI-encode a URL path, preserving forward slashes.
fn uri_encode_path(path: &str) -> String {
    path.split('/')
        .map(uri_encode)
        .collect::<Vec<String>>()
        .join("/")
}
