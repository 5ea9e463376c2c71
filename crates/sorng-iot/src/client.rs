//! The IoT client and its invocation pipeline.
//!
//! Every facade method (see the `model` modules) goes through
//! [`IotClient::call`]: marshal the input with the operation's
//! [`OperationSpec`], attach endpoint and clock skew, resolve credentials,
//! sign, send through the [`Transport`], then decode the response or map the
//! service error. The client keeps no per-call state.

use crate::config::{ClientConfig, IotRegion, SERVICE};
use crate::context::{Clock, ExecutionContext, SystemClock};
use crate::credentials::{
    Credentials, EnvironmentCredentialsProvider, ProvideCredentials, StaticCredentialsProvider,
};
use crate::error::{IotError, IotResult};
use crate::http::HttpRequest;
use crate::metrics::{MetricField, MetricsCollector};
use crate::model;
use crate::operation::{self, OperationSpec, Request};
use crate::signing::SigV4Signer;
use crate::transport::{ReqwestTransport, Transport};
use crate::unmarshal::{self, EmptyResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Client for the AWS IoT control plane.
///
/// Cheap to clone; clones share the transport, credentials provider and
/// metrics collector.
#[derive(Clone)]
pub struct IotClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    credentials_provider: Arc<dyn ProvideCredentials>,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for IotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IotClient")
            .field("region", &self.config.region.name)
            .field("endpoint", &self.config.endpoint())
            .field("metrics", &self.metrics_collector.is_some())
            .finish()
    }
}

impl IotClient {
    /// Client with the default transport and environment credentials.
    pub fn new(config: ClientConfig) -> IotResult<Self> {
        Self::builder(config).build()
    }

    /// Client configured entirely from the environment.
    pub fn from_environment() -> IotResult<Self> {
        Self::new(ClientConfig::from_environment())
    }

    pub fn builder(config: ClientConfig) -> IotClientBuilder {
        IotClientBuilder::new(config)
    }

    /// A new client for `region` sharing this client's transport,
    /// credentials provider, metrics collector and clock.
    ///
    /// A custom `endpoint_url` belongs to the old region and is dropped; the
    /// new client talks to the regional endpoint.
    pub fn with_region(&self, region: &str) -> IotResult<Self> {
        let config = ClientConfig {
            region: IotRegion::new(region),
            endpoint_url: None,
            ..(*self.config).clone()
        };
        config
            .validate()
            .map_err(|e| IotError::client("InvalidConfig", &e))?;

        log::debug!("AWS IoT client switched to region {}", region);
        Ok(Self {
            config: Arc::new(config),
            ..self.clone()
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn region(&self) -> &str {
        &self.config.region.name
    }

    /// Every operation this client can call.
    pub fn operations() -> &'static [&'static OperationSpec] {
        model::OPERATIONS
    }

    /// Look up an operation by name.
    pub fn operation(name: &str) -> Option<&'static OperationSpec> {
        model::OPERATIONS.iter().copied().find(|op| op.name == name)
    }

    // ── Invocation pipeline ─────────────────────────────────────────────

    /// Run one operation end to end.
    pub fn call<I, O>(&self, spec: &'static OperationSpec, request: Request<I>) -> IotResult<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let Request {
            params,
            credentials,
        } = request;
        let mut ctx = ExecutionContext::new(spec.name);
        let start = Instant::now();

        let result = ctx
            .metrics
            .time(MetricField::RequestMarshallTime, || {
                operation::marshal(spec, &params)
            })
            .and_then(|http_request| self.invoke(http_request, credentials, &mut ctx));

        ctx.metrics
            .record(MetricField::ClientExecuteTime, start.elapsed());
        if let Err(ref e) = result {
            ctx.metrics.error_code = Some(e.code.clone());
        }
        self.finish(&ctx);

        result.map_err(|e| e.with_operation(spec.name))
    }

    /// [`call`](Self::call) for operations whose response has no members.
    pub fn call_unit<I: Serialize>(
        &self,
        spec: &'static OperationSpec,
        request: Request<I>,
    ) -> IotResult<()> {
        self.call::<I, EmptyResponse>(spec, request).map(|_| ())
    }

    fn invoke<O: DeserializeOwned>(
        &self,
        mut request: HttpRequest,
        override_credentials: Option<Credentials>,
        ctx: &mut ExecutionContext,
    ) -> IotResult<O> {
        request.endpoint = Some(self.config.endpoint());
        request.time_offset_secs = self.config.time_offset_secs;
        request.set_header("amz-sdk-invocation-id", &ctx.invocation_id);

        let start = Instant::now();
        let credentials = match override_credentials {
            Some(credentials) => StaticCredentialsProvider::new(credentials).provide_credentials(),
            None => self.credentials_provider.provide_credentials(),
        };
        ctx.metrics
            .record(MetricField::CredentialsRequestTime, start.elapsed());
        let credentials = credentials?;

        let signer = SigV4Signer::new(&credentials, &self.config.region.name, SERVICE);
        ctx.credentials = Some(credentials);
        let now = self.clock.now();
        ctx.metrics.time(MetricField::RequestSigningTime, || {
            signer.sign(&mut request, now)
        })?;

        let transport = &self.transport;
        let response = ctx
            .metrics
            .time(MetricField::HttpRequestTime, || transport.send(&request))?;
        ctx.metrics.status_code = Some(response.status);

        ctx.metrics
            .time(MetricField::ResponseUnmarshallTime, || {
                unmarshal::unmarshal(&response)
            })
    }

    fn finish(&self, ctx: &ExecutionContext) {
        log::debug!(
            "AWS IoT {} [{}] finished: status={:?} error={:?} in {:?}",
            ctx.operation,
            ctx.invocation_id,
            ctx.metrics.status_code,
            ctx.metrics.error_code,
            ctx.metrics.timing(MetricField::ClientExecuteTime)
        );
        if let Some(ref collector) = self.metrics_collector {
            collector.collect(&ctx.metrics);
        }
    }
}

// ── Builder ─────────────────────────────────────────────────────────────

/// Builder for [`IotClient`]; anything not set falls back to the defaults
/// (environment credentials, blocking `reqwest` transport, system clock, no
/// metrics collector).
pub struct IotClientBuilder {
    config: ClientConfig,
    credentials_provider: Option<Arc<dyn ProvideCredentials>>,
    transport: Option<Arc<dyn Transport>>,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
    clock: Option<Arc<dyn Clock>>,
}

impl IotClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            credentials_provider: None,
            transport: None,
            metrics_collector: None,
            clock: None,
        }
    }

    /// Sign every call with these credentials.
    pub fn credentials(self, credentials: Credentials) -> Self {
        self.credentials_provider(Arc::new(StaticCredentialsProvider::new(credentials)))
    }

    pub fn credentials_provider(mut self, provider: Arc<dyn ProvideCredentials>) -> Self {
        self.credentials_provider = Some(provider);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn metrics_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics_collector = Some(collector);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> IotResult<IotClient> {
        self.config
            .validate()
            .map_err(|e| IotError::client("InvalidConfig", &e))?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };

        log::debug!(
            "AWS IoT client for {} using endpoint {}",
            self.config.region.name,
            self.config.endpoint()
        );

        Ok(IotClient {
            config: Arc::new(self.config),
            transport,
            credentials_provider: self
                .credentials_provider
                .unwrap_or_else(|| Arc::new(EnvironmentCredentialsProvider::new())),
            metrics_collector: self.metrics_collector,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}
