//! Per-call request metrics.
//!
//! Timings are diagnostics only; nothing in the call path reads them back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Phases of a call that are timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricField {
    RequestMarshallTime,
    CredentialsRequestTime,
    RequestSigningTime,
    HttpRequestTime,
    ResponseUnmarshallTime,
    ClientExecuteTime,
}

/// Metrics recorded for a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMetrics {
    pub operation: String,
    pub invocation_id: String,
    pub timings: BTreeMap<MetricField, Duration>,
    pub status_code: Option<u16>,
    pub error_code: Option<String>,
}

impl RequestMetrics {
    pub fn new(operation: &str, invocation_id: &str) -> Self {
        Self {
            operation: operation.to_string(),
            invocation_id: invocation_id.to_string(),
            timings: BTreeMap::new(),
            status_code: None,
            error_code: None,
        }
    }

    /// Record a timing, adding to any previous value for the same field.
    pub fn record(&mut self, field: MetricField, elapsed: Duration) {
        *self.timings.entry(field).or_default() += elapsed;
    }

    /// Run `f` and record how long it took.
    pub fn time<T>(&mut self, field: MetricField, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(field, start.elapsed());
        out
    }

    pub fn timing(&self, field: MetricField) -> Option<Duration> {
        self.timings.get(&field).copied()
    }
}

/// Receives the metrics of every completed call.
pub trait MetricsCollector: Send + Sync {
    fn collect(&self, metrics: &RequestMetrics);
}

/// Writes each call's metrics to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMetricsCollector;

impl MetricsCollector for LogMetricsCollector {
    fn collect(&self, metrics: &RequestMetrics) {
        let timings = metrics
            .timings
            .iter()
            .map(|(field, d)| format!("{:?}={}us", field, d.as_micros()))
            .collect::<Vec<_>>()
            .join(" ");
        log::info!(
            "AWS IoT {} [{}] status={:?} error={:?} {}",
            metrics.operation,
            metrics.invocation_id,
            metrics.status_code,
            metrics.error_code,
            timings
        );
    }
}

/// Keeps every collected entry in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetricsCollector {
    entries: Mutex<Vec<RequestMetrics>>,
}

impl InMemoryMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything collected so far.
    pub fn entries(&self) -> Vec<RequestMetrics> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MetricsCollector for InMemoryMetricsCollector {
    fn collect(&self, metrics: &RequestMetrics) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(metrics.clone()),
            Err(poisoned) => poisoned.into_inner().push(metrics.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates() {
        let mut m = RequestMetrics::new("ListThings", "id-1");
        m.record(MetricField::HttpRequestTime, Duration::from_millis(5));
        m.record(MetricField::HttpRequestTime, Duration::from_millis(7));
        assert_eq!(
            m.timing(MetricField::HttpRequestTime),
            Some(Duration::from_millis(12))
        );
        assert_eq!(m.timing(MetricField::ClientExecuteTime), None);
    }

    #[test]
    fn time_returns_closure_value() {
        let mut m = RequestMetrics::new("ListThings", "id-1");
        let v = m.time(MetricField::RequestMarshallTime, || 42);
        assert_eq!(v, 42);
        assert!(m.timing(MetricField::RequestMarshallTime).is_some());
    }

    #[test]
    fn in_memory_collector_keeps_entries() {
        let c = InMemoryMetricsCollector::new();
        c.collect(&RequestMetrics::new("DescribeThing", "a"));
        c.collect(&RequestMetrics::new("DeleteThing", "b"));
        let ops: Vec<String> = c.entries().into_iter().map(|m| m.operation).collect();
        assert_eq!(ops, vec!["DescribeThing", "DeleteThing"]);
    }
}
