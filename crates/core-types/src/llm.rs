//! Model endpoint configuration and health-accounting types shared between
//! the model manager and whatever reports on it (CLI status output, logs).
//!
//! These types describe *an* endpoint; nothing here knows how to speak to
//! one — that is `model-manager`'s job. Keeping the record here lets
//! `agent-core` build prompts and reason about endpoint choice without
//! depending on the HTTP client crates `model-manager` pulls in.

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};

/// Which chat-completions wire format an endpoint speaks.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum LlmProviderKind {
    OpenAi,
    Anthropic,
    AzureOpenAi,
    Compatible,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

impl Default for HealthStatus {
    fn default() -> Self {
        HealthStatus::Unknown
    }
}

/// How the model manager picks among several enabled, healthy endpoints.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum EndpointSelectionStrategy {
    /// Always prefer the lowest `priority` value among healthy endpoints.
    Priority,
    /// Cycle through healthy endpoints in order, one per call.
    RoundRobin,
    /// Weight selection by `weight`, biasing toward endpoints with lower
    /// recent average response time.
    LoadBalance,
    /// Use the first endpoint until it fails, then permanently move on to
    /// the next for the remainder of the run.
    Failover,
    /// Pick uniformly at random among healthy endpoints.
    Random,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default)]
pub struct HealthCheck {
    pub status: HealthStatus,
    pub last_check: Option<String>,
    pub response_time_ms: Option<u64>,
    pub error_count: u32,
}

/// A single configured model endpoint: provider, credentials, and the
/// priority/weight the selection strategy uses to rank it against siblings.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug)]
pub struct LLMEndpoint {
    pub id: String,
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub priority: u32,
    pub weight: u32,
    pub enabled: bool,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub health: HealthCheck,
}

/// Cumulative usage counters for one endpoint, updated after every call.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default)]
pub struct LLMStats {
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_response_time_ms: u64,
    pub last_used: Option<String>,
    pub tokens_used: u64,
}

impl LLMStats {
    pub fn average_response_time_ms(&self) -> f64 {
        if self.success_count == 0 {
            0.0
        } else {
            self.total_response_time_ms as f64 / self.success_count as f64
        }
    }

    pub fn record_success(&mut self, response_time_ms: u64, tokens: u64) {
        self.request_count += 1;
        self.success_count += 1;
        self.total_response_time_ms += response_time_ms;
        self.tokens_used += tokens;
    }

    pub fn record_error(&mut self) {
        self.request_count += 1;
        self.error_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_response_time_ignores_errors() {
        let mut stats = LLMStats::default();
        stats.record_success(100, 50);
        stats.record_success(300, 50);
        stats.record_error();
        assert_eq!(stats.average_response_time_ms(), 200.0);
        assert_eq!(stats.request_count, 3);
    }

    #[test]
    fn fresh_endpoint_health_defaults_unknown() {
        let health = HealthCheck::default();
        assert_eq!(health.status, HealthStatus::Unknown);
    }
}
