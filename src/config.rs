//! The merged configuration surface.
//!
//! Layering is defaults → `navigator.yaml`/`navigator.toml` on disk →
//! `NAVIGATOR_`-prefixed environment variables → CLI flags, highest
//! precedence last. [`AppConfig::load`] performs the merge; everything else
//! in this module is the deserialized shape.

use std::path::{Path, PathBuf};

use agent_core::AgentLoopConfig;
use model_manager::{EndpointConfig, LoadBalanceConfig, ModelManagerConfig, SelectionStrategy, UserControl};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("{0}")]
    Invalid(String),
}

/// The full set of options the core loop consumes. Deserializes directly
/// from the merged `config` crate source.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub browser: BrowserConfig,
    pub agent: AgentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            browser: BrowserConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

/// Mirrors `model_manager::ModelManagerConfig`'s wire shape; kept as a
/// distinct struct (rather than deriving `JsonSchema` on the crate's own
/// type) so the config surface can evolve independently of the in-process
/// manager shape, and so `-1` can be accepted on the wire for "unbounded"
/// before being mapped to `None`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ModelConfig {
    pub strategy: ModelStrategy,
    pub endpoints: Vec<EndpointSettings>,
    pub temperature: f32,
    /// `-1` means unbounded; mapped to `None` in [`ModelConfig::into_manager_config`].
    pub max_tokens: i64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_ms: u64,
    pub load_balance: LoadBalanceSettings,
    pub user_control: UserControlSettings,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            strategy: ModelStrategy::Priority,
            endpoints: Vec::new(),
            temperature: 0.0,
            max_tokens: -1,
            max_retries: 2,
            retry_delay_ms: 500,
            timeout_ms: 30_000,
            load_balance: LoadBalanceSettings::default(),
            user_control: UserControlSettings::default(),
        }
    }
}

impl ModelConfig {
    pub fn into_manager_config(self) -> ModelManagerConfig {
        ModelManagerConfig {
            strategy: self.strategy.into(),
            endpoints: self.endpoints.into_iter().map(EndpointSettings::into_endpoint_config).collect(),
            temperature: self.temperature,
            max_tokens: if self.max_tokens < 0 { None } else { Some(self.max_tokens as u32) },
            max_retries: self.max_retries,
            retry_delay: std::time::Duration::from_millis(self.retry_delay_ms),
            timeout: std::time::Duration::from_millis(self.timeout_ms),
            load_balance: LoadBalanceConfig {
                window: self.load_balance.window,
                health_check_interval_ms: self.load_balance.health_check_interval_ms,
                failure_threshold: self.load_balance.failure_threshold,
                recovery_threshold: self.load_balance.recovery_threshold,
            },
            user_control: UserControl {
                disable_health_check: self.user_control.disable_health_check,
                always_retry_all: self.user_control.always_retry_all,
                enable_fallback_mode: self.user_control.enable_fallback_mode,
                strict_mode: self.user_control.strict_mode,
                debug_mode: self.user_control.debug_mode,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModelStrategy {
    Priority,
    RoundRobin,
    LoadBalance,
    Failover,
    Random,
}

impl From<ModelStrategy> for SelectionStrategy {
    fn from(value: ModelStrategy) -> Self {
        match value {
            ModelStrategy::Priority => SelectionStrategy::Priority,
            ModelStrategy::RoundRobin => SelectionStrategy::RoundRobin,
            ModelStrategy::LoadBalance => SelectionStrategy::LoadBalance,
            ModelStrategy::Failover => SelectionStrategy::Failover,
            ModelStrategy::Random => SelectionStrategy::Random,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct EndpointSettings {
    pub provider: EndpointProvider,
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    pub model: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl EndpointSettings {
    fn into_endpoint_config(self) -> EndpointConfig {
        EndpointConfig {
            provider: self.provider.into(),
            api_key: self.api_key,
            base_url: self.base_url,
            model: self.model,
            priority: self.priority,
            weight: self.weight,
            enabled: self.enabled,
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EndpointProvider {
    OpenAiCompatible,
    Anthropic,
}

impl From<EndpointProvider> for model_manager::Provider {
    fn from(value: EndpointProvider) -> Self {
        match value {
            EndpointProvider::OpenAiCompatible => model_manager::Provider::OpenAiCompatible,
            EndpointProvider::Anthropic => model_manager::Provider::Anthropic,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoadBalanceSettings {
    pub window: u32,
    pub health_check_interval_ms: u64,
    pub failure_threshold: u32,
    pub recovery_threshold: u32,
}

impl Default for LoadBalanceSettings {
    fn default() -> Self {
        Self {
            window: 20,
            health_check_interval_ms: 30_000,
            failure_threshold: 3,
            recovery_threshold: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserControlSettings {
    pub disable_health_check: bool,
    pub always_retry_all: bool,
    pub enable_fallback_mode: bool,
    pub strict_mode: bool,
    pub debug_mode: bool,
}

/// Browser launch options. Consumed by whichever `cdp_adapter::Driver`
/// implementation the host wires in; the driver itself is an external
/// collaborator this crate only specifies a contract for.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_data_dir: Option<String>,
    pub executable_path: Option<String>,
    pub timeout_ms: u64,
    pub args: Vec<String>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
    pub user_agent: Option<String>,
    pub color_scheme: Option<String>,
    pub accept_downloads: bool,
    pub downloads_path: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            user_data_dir: None,
            executable_path: None,
            timeout_ms: 30_000,
            args: Vec::new(),
            locale: None,
            timezone: None,
            user_agent: None,
            color_scheme: None,
            accept_downloads: false,
            downloads_path: None,
        }
    }
}

/// Agent loop tunables. Maps 1:1 onto `agent_core::AgentLoopConfig`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AgentConfig {
    pub max_steps: u32,
    pub max_actions_per_step: u32,
    pub use_vision: bool,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub enable_memory: bool,
    pub memory_size: usize,
    pub enable_loop_detection: bool,
    pub max_consecutive_failures: u32,
    pub max_similar_actions: u32,
    pub enable_plugins: bool,
    pub max_history_steps: usize,
    pub context_window_tokens: usize,
    pub navigation_settle_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let defaults = AgentLoopConfig::default();
        Self {
            max_steps: defaults.max_steps,
            max_actions_per_step: defaults.max_actions_per_step,
            use_vision: defaults.use_vision,
            max_retries: defaults.max_retries,
            retry_delay_ms: defaults.retry_delay_ms,
            enable_memory: defaults.enable_memory,
            memory_size: defaults.memory_size,
            enable_loop_detection: defaults.enable_loop_detection,
            max_consecutive_failures: defaults.max_consecutive_failures,
            max_similar_actions: defaults.max_similar_actions,
            enable_plugins: defaults.enable_plugins,
            max_history_steps: defaults.max_history_steps,
            context_window_tokens: defaults.context_window_tokens,
            navigation_settle_ms: defaults.navigation_settle_ms,
        }
    }
}

impl AgentConfig {
    pub fn into_loop_config(self) -> AgentLoopConfig {
        AgentLoopConfig {
            max_steps: self.max_steps,
            max_actions_per_step: self.max_actions_per_step,
            use_vision: self.use_vision,
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
            enable_memory: self.enable_memory,
            memory_size: self.memory_size,
            enable_loop_detection: self.enable_loop_detection,
            max_consecutive_failures: self.max_consecutive_failures,
            max_similar_actions: self.max_similar_actions,
            enable_plugins: self.enable_plugins,
            max_history_steps: self.max_history_steps,
            context_window_tokens: self.context_window_tokens,
            navigation_settle_ms: self.navigation_settle_ms,
        }
    }
}

impl AppConfig {
    /// Layers built-in defaults, an optional file on disk, `NAVIGATOR_`
    /// environment variables, and finally CLI-supplied overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = explicit_path {
            builder = builder.add_source(::config::File::from(path.to_path_buf()).required(true));
        } else if let Some(default_path) = default_config_path() {
            builder = builder.add_source(::config::File::from(default_path).required(false));
        }

        builder = builder.add_source(::config::Environment::with_prefix("NAVIGATOR").separator("__"));

        let merged = builder.build()?;
        let config: AppConfig = merged.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_steps == 0 {
            return Err(ConfigError::Invalid("agent.max_steps must be at least 1".to_string()));
        }
        if self.model.endpoints.is_empty() {
            tracing::warn!("no model endpoints configured; `navigator run` will have nothing to select from");
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    for candidate in ["navigator.yaml", "navigator.toml"] {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Some(path);
        }
    }
    let mut dir = dirs::config_dir()?;
    dir.push("navigator");
    dir.push("config.yaml");
    dir.exists().then_some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_the_manager_config_conversion() {
        let config = AppConfig::default();
        let manager_config = config.model.into_manager_config();
        assert_eq!(manager_config.max_tokens, None);
        assert_eq!(manager_config.max_retries, 2);
    }

    #[test]
    fn agent_config_matches_agent_loop_config_defaults() {
        let loop_config = AppConfig::default().agent.into_loop_config();
        assert_eq!(loop_config.max_steps, AgentLoopConfig::default().max_steps);
    }

    #[test]
    fn zero_max_steps_is_rejected_by_validation() {
        let mut config = AppConfig::default();
        config.agent.max_steps = 0;
        assert!(config.validate().is_err());
    }
}
