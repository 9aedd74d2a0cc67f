//! Store health checks
//!
//! A health check is a `ping` bounded by a timeout. Session backends are
//! connected by the ping if they were not already.

use std::time::{Duration, Instant};

use durastate_domain::ports::DurableStateStore;
use durastate_domain::value_objects::CallContext;
use serde::{Deserialize, Serialize};

use crate::logging::log_health_check;

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The store answered the ping
    Up,
    /// The ping failed, was cancelled, or timed out
    Down,
}

impl HealthStatus {
    /// Check if the status indicates the store is healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Up)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Name of the health check
    pub name: String,
    /// Current status
    pub status: HealthStatus,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// Optional error message
    pub error: Option<String>,
}

impl HealthCheck {
    /// Create a successful health check
    pub fn healthy<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Up,
            timestamp: chrono::Utc::now(),
            response_time_ms: 0,
            error: None,
        }
    }

    /// Create a failed health check
    pub fn failed<S: Into<String>>(name: S, error: Option<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Down,
            timestamp: chrono::Utc::now(),
            response_time_ms: 0,
            error,
        }
    }

    /// Set response time
    pub fn with_response_time(mut self, duration: Duration) -> Self {
        self.response_time_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Ping `store` and report the outcome as a [`HealthCheck`] named `name`
pub async fn check_store(
    name: &str,
    store: &dyn DurableStateStore,
    timeout: Duration,
) -> HealthCheck {
    let ctx = CallContext::background().timeout(timeout);
    let start = Instant::now();
    let check = match store.ping(&ctx).await {
        Ok(()) => HealthCheck::healthy(name),
        Err(e) => HealthCheck::failed(name, Some(e.to_string())),
    };
    let check = check.with_response_time(start.elapsed());
    log_health_check(name, check.status.is_healthy(), check.error.as_deref());
    check
}
