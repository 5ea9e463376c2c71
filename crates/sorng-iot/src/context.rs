//! Per-call execution context and the clock requests are signed against.

use crate::credentials::Credentials;
use crate::metrics::RequestMetrics;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of the signing time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Scratch state for one call: created by the facade, dropped when the call
/// returns.
#[derive(Debug)]
pub struct ExecutionContext {
    pub operation: &'static str,
    /// Sent as `amz-sdk-invocation-id`.
    pub invocation_id: String,
    pub metrics: RequestMetrics,
    /// Credentials the request was signed with, once resolved.
    pub credentials: Option<Credentials>,
}

impl ExecutionContext {
    pub fn new(operation: &'static str) -> Self {
        let invocation_id = Uuid::new_v4().to_string();
        Self {
            operation,
            metrics: RequestMetrics::new(operation, &invocation_id),
            invocation_id,
            credentials: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_per_call() {
        let a = ExecutionContext::new("DescribeThing");
        let b = ExecutionContext::new("DescribeThing");
        assert_ne!(a.invocation_id, b.invocation_id);
        assert_eq!(a.metrics.invocation_id, a.invocation_id);
        assert!(a.credentials.is_none());
        assert!(a.metrics.timings.is_empty());
    }

    #[test]
    fn fixed_clock_does_not_move() {
        let t = Utc::now();
        let clock = FixedClock(t);
        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), t);
    }
}
