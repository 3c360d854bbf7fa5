//! Agent decision and state types: what the model returns each step
//! ([`AgentOutput`]), what the loop records each step ([`AgentStep`]), and
//! the loop's running state between steps ([`AgentState`]).

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionResult};
use crate::dom::DOMState;

/// The model's verdict on whether the active tab is still the right one to
/// act on, and why. A `new_tab` or `switch_tab` action can leave several
/// tabs open; the loop asks the model to commit to one before the next step.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default)]
pub struct TabDecision {
    pub should_switch: bool,
    pub target_tab_id: Option<String>,
    pub reason: Option<String>,
}

/// One decision cycle's worth of model output: a running narrative
/// (`thinking`, `evaluation_previous_goal`, `memory`, `next_goal`) plus the
/// single action to execute next.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug)]
pub struct AgentOutput {
    pub thinking: Option<String>,
    pub evaluation_previous_goal: String,
    pub memory: String,
    pub next_goal: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub tab_decision: TabDecision,
    pub action: Action,
}

impl AgentOutput {
    pub fn is_done(&self) -> bool {
        matches!(self.action, Action::Done { .. })
    }

    pub fn done_result(&self) -> Option<(bool, &str)> {
        match &self.action {
            Action::Done { success, message } => Some((*success, message.as_str())),
            _ => None,
        }
    }
}

/// A completed step of the agent loop: what the page looked like, what the
/// model decided, and what happened when that decision was executed.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug)]
pub struct AgentStep {
    pub step_number: u32,
    pub action: Action,
    pub result: ActionResult,
    #[cfg_attr(feature = "serde-full", serde(skip))]
    pub dom_state: Option<DOMState>,
    pub timestamp: String,
    pub agent_output: Option<AgentOutput>,
}

/// Running state the controller threads through the loop. Memory is kept
/// bounded (see `AgentState::push_memory`) so the prompt assembled from it
/// cannot grow without limit across a long-running task.
#[derive(Clone, Debug)]
pub struct AgentState {
    pub step_number: u32,
    pub consecutive_failures: u32,
    pub last_action_type: Option<String>,
    pub last_action_target: Option<u32>,
    pub last_goal: Option<String>,
    pub current_goal: Option<String>,
    memory: Vec<String>,
    memory_limit: usize,
    pub start_time: std::time::Instant,
    pub stopped: bool,
    pub paused: bool,
    /// How many times in a row the most recent action has repeated, per the
    /// `Action::is_repeat_of` notion of sameness. Reset to 0 whenever a
    /// distinct action is taken.
    pub similar_action_count: u32,
}

impl AgentState {
    pub fn new(memory_limit: usize) -> Self {
        Self {
            step_number: 0,
            consecutive_failures: 0,
            last_action_type: None,
            last_action_target: None,
            last_goal: None,
            current_goal: None,
            memory: Vec::new(),
            memory_limit,
            start_time: std::time::Instant::now(),
            stopped: false,
            paused: false,
            similar_action_count: 0,
        }
    }

    pub fn push_memory(&mut self, entry: impl Into<String>) {
        self.memory.push(entry.into());
        if self.memory.len() > self.memory_limit {
            let overflow = self.memory.len() - self.memory_limit;
            self.memory.drain(0..overflow);
        }
    }

    pub fn memory(&self) -> &[String] {
        &self.memory
    }

    /// Updates `similar_action_count` and the last-action bookkeeping for a
    /// newly taken action. Returns the post-update count so callers can
    /// compare it against the loop-detection threshold without a second read.
    pub fn record_action(&mut self, action: &Action) -> u32 {
        let is_repeat = self
            .last_action_type
            .as_deref()
            .map(|t| t == action.type_name())
            .unwrap_or(false)
            && self
                .last_action_target
                .zip(action.target_index())
                .map(|(a, b)| a == b)
                .unwrap_or(self.last_action_target.is_none() && action.target_index().is_none());

        if is_repeat {
            self.similar_action_count += 1;
        } else {
            self.similar_action_count = 0;
        }
        self.last_action_type = Some(action.type_name().to_string());
        self.last_action_target = action.target_index();
        self.similar_action_count
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
