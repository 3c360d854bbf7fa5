use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    Priority,
    RoundRobin,
    LoadBalance,
    Failover,
    Random,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAiCompatible,
    Anthropic,
}

/// Per-provider request cap. `None` means the field is omitted from the
/// wire request rather than capped — this is the `maxTokens: -1` ("unbounded")
/// case from the distilled config surface, resolved per the Open Question
/// Decision recorded in `DESIGN.md`.
pub type MaxTokens = Option<u32>;

/// A fallback emitted (with a `tracing::warn!`) when a provider's wire
/// format requires a numeric cap but the configured endpoint asked for
/// unbounded output.
pub const DEFAULT_MAX_TOKENS_FALLBACK: u32 = 4096;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub provider: Provider,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_weight() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LoadBalanceConfig {
    pub window: u32,
    pub health_check_interval_ms: u64,
    pub failure_threshold: u32,
    pub recovery_threshold: u32,
}

impl Default for LoadBalanceConfig {
    fn default() -> Self {
        Self {
            window: 20,
            health_check_interval_ms: 30_000,
            failure_threshold: 3,
            recovery_threshold: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct UserControl {
    pub disable_health_check: bool,
    pub always_retry_all: bool,
    pub enable_fallback_mode: bool,
    pub strict_mode: bool,
    pub debug_mode: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelManagerConfig {
    pub strategy: SelectionStrategy,
    pub endpoints: Vec<EndpointConfig>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// `-1` in the wire config means unbounded; deserializing callers should
    /// map that sentinel to `None` before constructing this struct.
    #[serde(default)]
    pub max_tokens: MaxTokens,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay", with = "duration_millis")]
    pub retry_delay: Duration,
    #[serde(default = "default_timeout", with = "duration_millis")]
    pub timeout: Duration,
    #[serde(default)]
    pub load_balance: LoadBalanceConfig,
    #[serde(default)]
    pub user_control: UserControl,
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_timeout() -> Duration {
    Duration::from_millis(30_000)
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
