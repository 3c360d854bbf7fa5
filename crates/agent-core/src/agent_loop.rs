//! The Agent Loop: the primary state machine. Construction → Idle; `run()`
//! → Running; terminal states are Completed/Failed per the step algorithm.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use action_flow::Controller;
use browser_session::BrowserSession;
use chrono::Utc;
use core_types::{Action, DOMState};
use model_manager::{ChatMessage, ChatRequest, ModelManager, Role};
use uuid::Uuid;

use crate::config::AgentLoopConfig;
use crate::decision::{decision_schema, parse_agent_output};
use crate::loop_detection;
use crate::message_manager::MessageManager;
use crate::types::{AgentState, AgentStep, RunMetadata, RunResult, TerminationReason};

const CRITICAL_MESSAGE_PATTERNS: &[&str] = &["Browser session not started", "Browser crashed", "Authentication failed"];

/// Orchestrates the perception → decision → action cycle against a live
/// session, controller, and model manager. One `AgentLoop` runs one task to
/// completion; it is not reused across tasks.
pub struct AgentLoop {
    config: AgentLoopConfig,
    session: Arc<BrowserSession>,
    controller: Controller,
    model: Arc<ModelManager>,
    messages: MessageManager,
    agent_id: Uuid,
    session_id: Uuid,
    stopped: Arc<AtomicBool>,
}

impl AgentLoop {
    pub fn new(config: AgentLoopConfig, session: Arc<BrowserSession>, controller: Controller, model: Arc<ModelManager>) -> Self {
        Self {
            config,
            session,
            controller,
            model,
            messages: MessageManager::new(),
            agent_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cooperative cancellation of a running `run()` call. The loop
    /// checks this at the top of each step; in-flight driver or model calls
    /// are not pre-empted. Safe to call concurrently with `run()` or before
    /// it starts.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Runs the step algorithm to completion and returns the full history.
    /// Never panics on task failure; only a programmer-error condition
    /// (session failing to start) short-circuits before any steps are
    /// recorded.
    pub async fn run(&self, task: &str) -> RunResult {
        let start_time = Utc::now();
        let start_instant = Instant::now();

        if let Err(error) = self.session.start().await {
            return self.errored_result(task, start_time, start_instant, format!("failed to start session: {error}"));
        }

        let mut state = AgentState {
            stopped: Arc::clone(&self.stopped),
            ..AgentState::default()
        };
        state.current_goal = Some(task.to_string());
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut success = false;
        let mut reason = TerminationReason::MaxStepsExhausted;

        'steps: for step_number in 1..=self.config.max_steps {
            if state.is_stopped() {
                reason = TerminationReason::StoppedByCaller;
                break 'steps;
            }

            let dom_state = match self.session.get_dom_state().await {
                Ok(dom_state) => dom_state,
                Err(error) => {
                    tracing::warn!(step_number, error = %error, "failed to refresh DOM state; continuing");
                    continue;
                }
            };

            let screenshot = if self.config.use_vision {
                self.session.take_screenshot().await.ok()
            } else {
                None
            };

            let tabs = self.session.get_all_tabs_info().await.unwrap_or_default();
            let user_message = self.messages.build_user_message(
                &steps,
                &dom_state,
                &tabs,
                self.config.max_history_steps,
                500,
                self.config.context_window_tokens,
            );

            let output = self.decide(task, &user_message, screenshot).await;

            let mut dom_state = dom_state;
            let mut output = output;
            if output.tab_decision.should_switch {
                if let Some(target) = &output.tab_decision.target_tab_id {
                    let _ = self.session.switch_tab(target).await;
                }
                dom_state = self.session.get_dom_state().await.unwrap_or(dom_state);
            }

            if self.config.enable_loop_detection
                && loop_detection::is_loop(
                    &steps,
                    &output.action,
                    &output.next_goal,
                    output.evaluation_previous_goal.as_deref(),
                    state.consecutive_failures,
                    self.config.max_similar_actions,
                )
            {
                if state.consecutive_failures >= self.config.max_consecutive_failures {
                    let forced = crate::types::AgentOutput {
                        action: Action::Done {
                            message: "forced termination: loop detected with too many consecutive failures".to_string(),
                            success: false,
                        },
                        ..output
                    };
                    steps.push(AgentStep {
                        step_number,
                        output: forced,
                        result: core_types::ActionResult::failed("loop detected"),
                        duration_ms: 0,
                    });
                    reason = TerminationReason::ForcedByLoopDetection;
                    break 'steps;
                }
                state.consecutive_failures += 1;
                tracing::debug!(step_number, "loop detected, action skipped this step");
                continue;
            }

            if !self.validate(&output.action, &dom_state) {
                tracing::warn!(step_number, action = output.action.type_name(), "invalid action target, skipping step");
                continue;
            }

            let step_started = Instant::now();
            let result = self.controller.dispatch(&output.action, &dom_state).await;
            let duration_ms = step_started.elapsed().as_millis() as u64;

            if result.navigation_detected == Some(true) {
                tokio::time::sleep(Duration::from_millis(self.config.navigation_settle_ms)).await;
                let _ = self.session.get_dom_state().await;
            }

            state.push_memory(output.memory.clone(), self.config.memory_size);
            if result.success {
                state.consecutive_failures = 0;
            } else {
                state.consecutive_failures += 1;
            }
            state.record_action(&output.action);
            state.current_goal = Some(output.next_goal.clone());

            let is_done = matches!(output.action, Action::Done { .. });
            let done_success = matches!(&output.action, Action::Done { success, .. } if *success);

            steps.push(AgentStep {
                step_number,
                output,
                result,
                duration_ms,
            });

            if is_done {
                success = done_success;
                reason = TerminationReason::Done;
                break 'steps;
            }

            if is_critical_error(steps.last()) {
                reason = TerminationReason::CriticalError;
                break 'steps;
            }
        }

        self.finish(task, start_time, start_instant, steps, success, reason)
    }

    async fn decide(&self, task: &str, user_message: &str, screenshot: Option<String>) -> crate::types::AgentOutput {
        let system_prompt = format!(
            "You are a browser automation agent. Task: {task}\nRespond with a single JSON decision matching the supplied schema."
        );
        let mut content = vec![model_manager::ContentPart::Text { text: user_message.to_string() }];
        if let Some(screenshot) = screenshot {
            content.push(model_manager::ContentPart::Image { base64: screenshot });
        }
        let request = ChatRequest {
            system: Some(system_prompt),
            messages: vec![ChatMessage { role: Role::User, content }],
            temperature: 0.0,
            max_tokens: None,
            response_schema: Some(decision_schema()),
        };

        match self.model.generate(&request).await {
            Ok(response) => parse_agent_output(&response.content),
            Err(error) => {
                tracing::warn!(error = %error, "model manager call failed; falling back to wait");
                crate::types::AgentOutput::fallback_wait()
            }
        }
    }

    /// Validates that an element-targeting action's index was present in the
    /// DOMState read during this same step (P6).
    fn validate(&self, action: &Action, dom_state: &DOMState) -> bool {
        match action.target_index() {
            Some(index) => dom_state.element(index).is_some(),
            None => true,
        }
    }

    fn errored_result(&self, task: &str, start_time: chrono::DateTime<Utc>, start_instant: Instant, message: String) -> RunResult {
        tracing::error!(error = %message, "agent loop failed to start");
        self.finish(task, start_time, start_instant, Vec::new(), false, TerminationReason::CriticalError)
    }

    fn finish(
        &self,
        task: &str,
        start_time: chrono::DateTime<Utc>,
        start_instant: Instant,
        steps: Vec<AgentStep>,
        success: bool,
        reason: TerminationReason,
    ) -> RunResult {
        let end_time = Utc::now();
        let error_count = steps.iter().filter(|step| !step.result.success).count() as u32;
        let screenshot_count = steps.iter().filter(|step| step.result.screenshot.is_some()).count() as u32;
        let final_url = steps.last().and_then(|step| step.result.metadata.as_ref()).and_then(|m| m.url.clone());
        let success_rate = RunResult::success_rate(&steps);

        RunResult {
            task: task.to_string(),
            completed: true,
            success,
            total_duration_ms: start_instant.elapsed().as_millis() as u64,
            start_time,
            end_time: Some(end_time),
            metadata: RunMetadata {
                agent_id: self.agent_id,
                session_id: self.session_id,
                termination_reason: reason,
                success_rate,
                error_count,
                screenshot_count,
                final_url,
            },
            steps,
        }
    }
}

fn is_critical_error(step: Option<&AgentStep>) -> bool {
    let Some(step) = step else { return false };
    let Some(error) = &step.result.error else { return false };
    CRITICAL_MESSAGE_PATTERNS.iter().any(|pattern| error.contains(pattern))
}

#[cfg(test)]
mod tests;
