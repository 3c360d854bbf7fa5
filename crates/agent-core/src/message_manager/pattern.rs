//! Pattern analysis (advisory only): surfaced for logging, never
//! consumed by loop detection or any other control decision.

use std::collections::HashMap;

use crate::types::AgentStep;

#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct PatternSummary {
    pub most_repeated_action: Option<String>,
    pub failure_rate: f64,
    pub average_step_duration_ms: f64,
    pub top_errors: Vec<String>,
}

pub fn analyze(steps: &[AgentStep]) -> PatternSummary {
    if steps.is_empty() {
        return PatternSummary::default();
    }

    let mut action_counts: HashMap<&'static str, u32> = HashMap::new();
    let mut error_counts: HashMap<&str, u32> = HashMap::new();
    let mut failures = 0u32;
    let mut total_duration = 0u64;

    for step in steps {
        *action_counts.entry(step.output.action.type_name()).or_default() += 1;
        total_duration += step.duration_ms;
        if !step.result.success {
            failures += 1;
            if let Some(error) = &step.result.error {
                *error_counts.entry(error.as_str()).or_default() += 1;
            }
        }
    }

    let most_repeated_action = action_counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name.to_string());

    let mut top_errors: Vec<(&str, u32)> = error_counts.into_iter().collect();
    top_errors.sort_by(|a, b| b.1.cmp(&a.1));
    let top_errors = top_errors.into_iter().take(3).map(|(message, _)| message.to_string()).collect();

    PatternSummary {
        most_repeated_action,
        failure_rate: failures as f64 / steps.len() as f64,
        average_step_duration_ms: total_duration as f64 / steps.len() as f64,
        top_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentOutput, TabDecision};
    use core_types::{Action, ActionResult};

    fn step(action: Action, success: bool, error: Option<&str>, duration_ms: u64) -> AgentStep {
        AgentStep {
            step_number: 1,
            output: AgentOutput {
                thinking: None,
                evaluation_previous_goal: None,
                memory: None,
                next_goal: "g".into(),
                tab_decision: TabDecision::stay(),
                action,
            },
            result: if success {
                ActionResult::ok("ok")
            } else {
                ActionResult::failed(error.unwrap_or("failed"))
            },
            duration_ms,
        }
    }

    #[test]
    fn failure_rate_and_average_duration_are_computed() {
        let steps = vec![
            step(Action::Wait { seconds: 1.0 }, true, None, 100),
            step(Action::Wait { seconds: 1.0 }, false, Some("not found"), 200),
        ];
        let summary = analyze(&steps);
        assert_eq!(summary.failure_rate, 0.5);
        assert_eq!(summary.average_step_duration_ms, 150.0);
        assert_eq!(summary.most_repeated_action, Some("wait".to_string()));
        assert_eq!(summary.top_errors, vec!["not found".to_string()]);
    }

    #[test]
    fn empty_history_yields_the_default_summary() {
        let summary = analyze(&[]);
        assert_eq!(summary.failure_rate, 0.0);
        assert!(summary.most_repeated_action.is_none());
    }
}
