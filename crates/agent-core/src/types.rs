//! Per-step decision shape, run history, and the final result returned from
//! `AgentLoop::run`. `Action`/`ActionResult` live in `core_types`; everything
//! here is agent-loop-specific.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use core_types::{Action, ActionResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The model's per-step decision. All fields required except `thinking`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentOutput {
    #[serde(default)]
    pub thinking: Option<String>,
    pub evaluation_previous_goal: Option<String>,
    pub memory: Option<String>,
    pub next_goal: String,
    pub tab_decision: TabDecision,
    pub action: Action,
}

impl AgentOutput {
    /// The synthesized fallback used when the model's response can't be
    /// parsed even after lenient repair.
    pub fn fallback_wait() -> Self {
        Self {
            thinking: None,
            evaluation_previous_goal: None,
            memory: None,
            next_goal: "recover from malformed model response".to_string(),
            tab_decision: TabDecision::stay(),
            action: Action::Wait { seconds: 1.0 },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TabDecision {
    pub should_switch: bool,
    #[serde(default)]
    pub target_tab_id: Option<String>,
    pub reason: String,
}

impl TabDecision {
    pub fn stay() -> Self {
        Self {
            should_switch: false,
            target_tab_id: None,
            reason: "no tab switch needed".to_string(),
        }
    }
}

/// One completed iteration of the loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentStep {
    pub step_number: u32,
    pub output: AgentOutput,
    pub result: ActionResult,
    pub duration_ms: u64,
}

/// The agent's mutable state across steps.
#[derive(Clone, Debug, Default)]
pub struct AgentState {
    /// Last `memory_size` remembered facts, oldest first.
    pub memory: Vec<String>,
    pub consecutive_failures: u32,
    pub last_action_type: Option<String>,
    pub last_action_target: Option<u32>,
    pub current_goal: Option<String>,
    /// Shared with the owning `AgentLoop` so `AgentLoop::stop()` can request
    /// cooperative cancellation from outside the running step loop.
    pub stopped: Arc<AtomicBool>,
    pub paused: bool,
}

impl AgentState {
    pub fn push_memory(&mut self, fact: Option<String>, cap: usize) {
        if let Some(fact) = fact {
            self.memory.push(fact);
            if self.memory.len() > cap {
                let excess = self.memory.len() - cap;
                self.memory.drain(0..excess);
            }
        }
    }

    pub fn record_action(&mut self, action: &Action) {
        self.last_action_type = Some(action.type_name().to_string());
        self.last_action_target = action.target_index();
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    Done,
    MaxStepsExhausted,
    ForcedByLoopDetection,
    CriticalError,
    StoppedByCaller,
}

/// Returned from `run()`. Stable field names, JSON-serializable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub task: String,
    pub steps: Vec<AgentStep>,
    pub completed: bool,
    pub success: bool,
    pub total_duration_ms: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub metadata: RunMetadata,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunMetadata {
    pub agent_id: Uuid,
    pub session_id: Uuid,
    pub termination_reason: TerminationReason,
    pub success_rate: f64,
    pub error_count: u32,
    pub screenshot_count: u32,
    pub final_url: Option<String>,
}

impl RunResult {
    pub fn success_rate(steps: &[AgentStep]) -> f64 {
        if steps.is_empty() {
            return 0.0;
        }
        let successes = steps.iter().filter(|step| step.result.success).count();
        successes as f64 / steps.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_caps_to_the_configured_size() {
        let mut state = AgentState::default();
        for i in 0..15 {
            state.push_memory(Some(format!("fact {i}")), 10);
        }
        assert_eq!(state.memory.len(), 10);
        assert_eq!(state.memory.first().unwrap(), "fact 5");
        assert_eq!(state.memory.last().unwrap(), "fact 14");
    }

    #[test]
    fn fallback_wait_is_a_one_second_wait_action() {
        let output = AgentOutput::fallback_wait();
        assert!(matches!(output.action, Action::Wait { seconds } if seconds == 1.0));
        assert!(!output.tab_decision.should_switch);
    }
}
