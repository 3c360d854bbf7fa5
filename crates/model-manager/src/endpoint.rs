use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::client::ChatClient;
use crate::config::EndpointConfig;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HealthStatus {
    Unknown,
    Healthy,
    Unhealthy,
}

#[derive(Clone, Copy, Debug)]
pub struct EndpointHealth {
    pub status: HealthStatus,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_response_time_ms: u64,
    pub average_response_time_ms: f64,
}

impl Default for EndpointHealth {
    fn default() -> Self {
        Self {
            status: HealthStatus::Unknown,
            consecutive_failures: 0,
            consecutive_successes: 0,
            request_count: 0,
            success_count: 0,
            error_count: 0,
            total_response_time_ms: 0,
            average_response_time_ms: 0.0,
        }
    }
}

/// One configured model endpoint plus its live health counters and the
/// client that actually talks to it.
pub struct Endpoint {
    pub config: EndpointConfig,
    pub client: Arc<dyn ChatClient>,
    health: RwLock<EndpointHealth>,
}

impl Endpoint {
    pub fn new(config: EndpointConfig, client: Arc<dyn ChatClient>) -> Self {
        Self {
            config,
            client,
            health: RwLock::new(EndpointHealth::default()),
        }
    }

    pub async fn health(&self) -> EndpointHealth {
        *self.health.read().await
    }

    /// `enabled≠false` and `healthCheck.status≠unhealthy`; `unknown` counts
    /// as available.
    pub async fn is_available(&self) -> bool {
        self.config.enabled && self.health.read().await.status != HealthStatus::Unhealthy
    }

    pub async fn record_success(&self, elapsed: Duration, failure_threshold: u32, recovery_threshold: u32) {
        let mut health = self.health.write().await;
        health.request_count += 1;
        health.success_count += 1;
        health.consecutive_successes += 1;
        health.consecutive_failures = 0;
        health.total_response_time_ms += elapsed.as_millis() as u64;
        health.average_response_time_ms = health.total_response_time_ms as f64 / health.request_count as f64;
        if health.consecutive_successes >= recovery_threshold {
            health.status = HealthStatus::Healthy;
        }
        let _ = failure_threshold;
    }

    pub async fn record_failure(&self, failure_threshold: u32) {
        let mut health = self.health.write().await;
        health.request_count += 1;
        health.error_count += 1;
        health.consecutive_failures += 1;
        health.consecutive_successes = 0;
        if health.consecutive_failures >= failure_threshold {
            health.status = HealthStatus::Unhealthy;
        }
    }

    /// Called by the health-check timer: gives an unhealthy endpoint one
    /// more chance by resetting its failure streak to `unknown` rather than
    /// leaving it permanently excluded until a caller happens to route a
    /// request to it through fallback mode.
    pub async fn reset_for_probation(&self) {
        let mut health = self.health.write().await;
        if health.status == HealthStatus::Unhealthy {
            health.status = HealthStatus::Unknown;
            health.consecutive_failures = 0;
        }
    }
}
