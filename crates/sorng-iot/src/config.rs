//! Client configuration and region handling.
//!
//! Everything here is fixed when an [`IotClient`](crate::client::IotClient)
//! is built. Switching region means building a new client.

use serde::{Deserialize, Serialize};

/// Signing name and endpoint prefix of the IoT control plane.
pub const SERVICE: &str = "iot";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Largest clock skew, in either direction, a client accepts.
pub const MAX_TIME_OFFSET_SECS: i64 = 86_400;

/// Regions where the AWS IoT control plane is available.
pub const IOT_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-south-1",
    "eu-north-1",
    "me-south-1",
    "me-central-1",
    "sa-east-1",
    // GovCloud
    "us-gov-east-1",
    "us-gov-west-1",
    // China
    "cn-north-1",
    "cn-northwest-1",
];

/// AWS region configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IotRegion {
    /// Region code (e.g., "eu-west-1").
    pub name: String,
}

impl IotRegion {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Resolve the region from `AWS_REGION`, then `AWS_DEFAULT_REGION`.
    pub fn from_environment() -> Option<Self> {
        std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .ok()
            .filter(|r| !r.trim().is_empty())
            .map(|r| Self::new(r.trim()))
    }

    /// Control-plane endpoint for this region.
    pub fn endpoint(&self) -> String {
        if self.name.starts_with("cn-") {
            format!("https://{}.{}.amazonaws.com.cn", SERVICE, self.name)
        } else {
            format!("https://{}.{}.amazonaws.com", SERVICE, self.name)
        }
    }

    /// Check if AWS IoT is offered in this region.
    pub fn is_valid(&self) -> bool {
        IOT_REGIONS.contains(&self.name.as_str())
    }
}

impl Default for IotRegion {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

// ── Retry Configuration ─────────────────────────────────────────────────

/// Retry configuration applied by the HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one (default: 3).
    pub max_attempts: u32,
    /// Backoff mode.
    pub mode: RetryMode,
    /// Initial backoff duration in milliseconds (default: 500).
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds (default: 20_000).
    pub max_backoff_ms: u64,
}

impl RetryConfig {
    /// A configuration that sends every request exactly once.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            mode: RetryMode::Standard,
            initial_backoff_ms: 500,
            max_backoff_ms: 20_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RetryMode {
    /// Exponential backoff with full jitter.
    Standard,
    /// Same backoff as `Standard`.
    Adaptive,
    /// Capped exponential backoff without jitter.
    Legacy,
}

// ── Client Config ───────────────────────────────────────────────────────

/// Construction-time configuration of an IoT client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub region: IotRegion,
    /// Custom endpoint URL (for LocalStack, VPC endpoints, etc.).
    pub endpoint_url: Option<String>,
    pub retry_config: RetryConfig,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Client clock skew in seconds, subtracted from the local clock when
    /// signing (positive when the local clock runs ahead of the service).
    pub time_offset_secs: i64,
    /// User-Agent suffix appended to requests.
    pub app_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: IotRegion::default(),
            endpoint_url: None,
            retry_config: RetryConfig::default(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            time_offset_secs: 0,
            app_name: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration in the given region.
    pub fn for_region(region: &str) -> Self {
        Self {
            region: IotRegion::new(region),
            ..Self::default()
        }
    }

    /// Default configuration with the region taken from the environment.
    pub fn from_environment() -> Self {
        Self {
            region: IotRegion::from_environment().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> String {
        match self.endpoint_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => self.region.endpoint(),
        }
    }

    /// User-Agent header value.
    pub fn user_agent(&self) -> String {
        let base = format!("sorng-iot/{}", env!("CARGO_PKG_VERSION"));
        match self.app_name {
            Some(ref app) => format!("{} app/{}", base, app),
            None => base,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.region.name.is_empty() {
            return Err("Region is required".to_string());
        }
        if self.retry_config.max_attempts == 0 {
            return Err("Retry max_attempts must be at least 1".to_string());
        }
        if self.time_offset_secs.unsigned_abs() > MAX_TIME_OFFSET_SECS as u64 {
            return Err(format!(
                "Clock offset {}s exceeds {}s",
                self.time_offset_secs, MAX_TIME_OFFSET_SECS
            ));
        }
        if let Some(ref url) = self.endpoint_url {
            let parsed = url::Url::parse(url).map_err(|e| format!("Invalid endpoint URL: {}", e))?;
            if parsed.host_str().is_none() {
                return Err(format!("Endpoint URL '{}' has no host", url));
            }
        }
        if !self.region.is_valid() {
            log::warn!(
                "Region '{}' is not a known AWS IoT region; using it anyway",
                self.region.name
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_endpoint_standard() {
        let r = IotRegion::new("eu-west-1");
        assert_eq!(r.endpoint(), "https://iot.eu-west-1.amazonaws.com");
    }

    #[test]
    fn region_endpoint_china() {
        let r = IotRegion::new("cn-north-1");
        assert_eq!(r.endpoint(), "https://iot.cn-north-1.amazonaws.com.cn");
    }

    #[test]
    fn region_endpoint_govcloud() {
        let r = IotRegion::new("us-gov-west-1");
        assert_eq!(r.endpoint(), "https://iot.us-gov-west-1.amazonaws.com");
        assert!(r.is_valid());
    }

    #[test]
    fn region_is_valid() {
        assert!(IotRegion::new("us-east-1").is_valid());
        assert!(!IotRegion::new("mars-central-1").is_valid());
    }

    #[test]
    fn default_config() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.region.name, DEFAULT_REGION);
        assert_eq!(cfg.endpoint(), "https://iot.us-east-1.amazonaws.com");
        assert_eq!(cfg.retry_config.max_attempts, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn endpoint_override_wins() {
        let cfg = ClientConfig {
            endpoint_url: Some("http://localhost:4566/".to_string()),
            ..ClientConfig::for_region("eu-central-1")
        };
        assert_eq!(cfg.endpoint(), "http://localhost:4566");
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let cfg = ClientConfig {
            endpoint_url: Some("not a url".to_string()),
            ..ClientConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let cfg = ClientConfig {
            retry_config: RetryConfig {
                max_attempts: 0,
                ..RetryConfig::default()
            },
            ..ClientConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_bounds_clock_offset() {
        let at_limit = ClientConfig {
            time_offset_secs: -MAX_TIME_OFFSET_SECS,
            ..ClientConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        for offset in [MAX_TIME_OFFSET_SECS + 1, i64::MAX, i64::MIN] {
            let cfg = ClientConfig {
                time_offset_secs: offset,
                ..ClientConfig::default()
            };
            assert!(cfg.validate().is_err(), "{}", offset);
        }
    }

    #[test]
    fn user_agent_with_app_name() {
        let cfg = ClientConfig {
            app_name: Some("fleet-manager".to_string()),
            ..ClientConfig::default()
        };
        assert!(cfg.user_agent().starts_with("sorng-iot/"));
        assert!(cfg.user_agent().ends_with("app/fleet-manager"));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = ClientConfig {
            time_offset_secs: -12,
            ..ClientConfig::for_region("ap-southeast-2")
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
