//! # sorng-iot – AWS IoT control-plane client
//!
//! Blocking client for the AWS IoT management API (things, thing types,
//! thing groups, certificates, policies, jobs, Device Defender audits,
//! topic rules, endpoints) with real SigV4 request signing.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  IotClient facade  (model/*.rs)                  │
//! │  └── one method per operation, each backed by a  │
//! │      static OperationSpec                        │
//! ├──────────────────────────────────────────────────┤
//! │  marshal  (operation.rs)                         │
//! │  └── labels · query · headers · JSON body        │
//! ├──────────────────────────────────────────────────┤
//! │  IotClient::call  (client.rs)                    │
//! │  ├── endpoint + clock skew                       │
//! │  ├── ProvideCredentials  (credentials.rs)        │
//! │  ├── SigV4Signer  (signing.rs)                   │
//! │  ├── Transport  (transport.rs, retries)          │
//! │  └── unmarshal / error mapping  (unmarshal.rs)   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sorng_iot::model::things::DescribeThingRequest;
//! use sorng_iot::{ClientConfig, Credentials, IotClient, IotErrorKind};
//!
//! let client = IotClient::builder(ClientConfig::for_region("eu-west-1"))
//!     .credentials(Credentials::new("AKIDEXAMPLE", "secret"))
//!     .build()?;
//!
//! match client.describe_thing(DescribeThingRequest { thing_name: "sensor-1".into() }) {
//!     Ok(thing) => println!("{:?}", thing.thing_arn),
//!     Err(e) if e.is(IotErrorKind::ResourceNotFound) => println!("no such thing"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), sorng_iot::IotError>(())
//! ```

// ── Sub-modules ─────────────────────────────────────────────────────────

pub mod error;
pub mod config;
pub mod credentials;
pub mod http;
pub mod signing;
pub mod transport;
pub mod metrics;
pub mod context;
pub mod operation;
pub mod unmarshal;
pub mod client;

// Operation catalog and facade methods
pub mod model;

// ── Re-exports for ergonomic access ─────────────────────────────────────

pub use client::{IotClient, IotClientBuilder};
pub use config::{ClientConfig, IotRegion, RetryConfig, RetryMode};
pub use context::{Clock, FixedClock, SystemClock};
pub use credentials::{
    Credentials, EnvironmentCredentialsProvider, ProvideCredentials, StaticCredentialsProvider,
};
pub use error::{IotError, IotErrorKind, IotResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use metrics::{
    InMemoryMetricsCollector, LogMetricsCollector, MetricField, MetricsCollector, RequestMetrics,
};
pub use operation::{OperationSpec, Request};
pub use transport::{ReqwestTransport, Transport};
