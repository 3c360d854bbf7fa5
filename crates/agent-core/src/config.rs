//! Configuration for the agent loop.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentLoopConfig {
    /// Hard cap on step count; the ultimate liveness bound.
    pub max_steps: u32,
    /// LLM decisions may carry more than one action; this caps how many of
    /// them the loop actually executes per step.
    pub max_actions_per_step: u32,
    /// Whether to capture and attach a screenshot to the decision request.
    pub use_vision: bool,
    /// Retries the loop itself performs around a single step's model call,
    /// distinct from `model-manager`'s own per-endpoint retry policy.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    /// Caps `AgentState.memory` to the last N entries.
    pub enable_memory: bool,
    pub memory_size: usize,
    pub enable_loop_detection: bool,
    /// Consecutive failed steps before a forced `done(success=false)`.
    pub max_consecutive_failures: u32,
    /// Identical-action repetition threshold for loop detection.
    pub max_similar_actions: u32,
    pub enable_plugins: bool,
    /// Steps retained in full by the message manager's history window.
    pub max_history_steps: usize,
    /// Estimated token budget; exceeding it trims history to its last 70%.
    pub context_window_tokens: usize,
    /// SPA settlement wait after a navigation-flagged action, in ms.
    pub navigation_settle_ms: u64,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            max_actions_per_step: 3,
            use_vision: false,
            max_retries: 2,
            retry_delay_ms: 500,
            enable_memory: true,
            memory_size: 10,
            enable_loop_detection: true,
            max_consecutive_failures: 3,
            max_similar_actions: 3,
            enable_plugins: true,
            max_history_steps: 10,
            context_window_tokens: 16_000,
            navigation_settle_ms: 1_500,
        }
    }
}

impl AgentLoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tight config for unit tests: few steps, no settling delay.
    pub fn minimal() -> Self {
        Self {
            max_steps: 10,
            max_actions_per_step: 1,
            use_vision: false,
            max_retries: 0,
            retry_delay_ms: 0,
            enable_memory: true,
            memory_size: 10,
            enable_loop_detection: true,
            max_consecutive_failures: 2,
            max_similar_actions: 2,
            enable_plugins: false,
            max_history_steps: 5,
            context_window_tokens: 4_000,
            navigation_settle_ms: 0,
        }
    }

    pub fn max_steps(mut self, steps: u32) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn vision(mut self, enabled: bool) -> Self {
        self.use_vision = enabled;
        self
    }

    pub fn loop_detection(mut self, enabled: bool) -> Self {
        self.enable_loop_detection = enabled;
        self
    }

    pub fn max_similar_actions(mut self, threshold: u32) -> Self {
        self.max_similar_actions = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = AgentLoopConfig::default();
        assert_eq!(config.max_steps, 100);
        assert_eq!(config.max_similar_actions, 3);
        assert!(config.enable_loop_detection);
    }

    #[test]
    fn builder_overrides_apply() {
        let config = AgentLoopConfig::new().max_steps(5).vision(true).loop_detection(false);
        assert_eq!(config.max_steps, 5);
        assert!(config.use_vision);
        assert!(!config.enable_loop_detection);
    }
}
