//! History formatting: renders each retained step as `<step_N>` plus the
//! invariant preamble, trimmed to the last
//! `max_history_steps`.

use crate::types::AgentStep;

const PREAMBLE: &str = "<s>Agent initialized</s>";

pub fn format_history(steps: &[AgentStep], max_history_steps: usize) -> String {
    let retained = &steps[steps.len().saturating_sub(max_history_steps)..];
    let mut rendered = String::new();
    rendered.push_str(PREAMBLE);
    rendered.push('\n');
    for step in retained {
        rendered.push_str(&format_step(step));
        rendered.push('\n');
    }
    rendered
}

fn format_step(step: &AgentStep) -> String {
    let evaluation = step.output.evaluation_previous_goal.as_deref().unwrap_or("-");
    let memory = step.output.memory.as_deref().unwrap_or("-");
    let result_summary = if step.result.success {
        step.result.message.as_deref().unwrap_or("ok")
    } else {
        step.result.error.as_deref().unwrap_or("failed")
    };
    format!(
        "<step_{n}>\nevaluation_previous_goal: {evaluation}\nmemory: {memory}\nnext_goal: {next_goal}\nresult: {result_summary}\n</step_{n}>",
        n = step.step_number,
        next_goal = step.output.next_goal,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentOutput, TabDecision};
    use core_types::{Action, ActionResult};

    fn step(n: u32) -> AgentStep {
        AgentStep {
            step_number: n,
            output: AgentOutput {
                thinking: None,
                evaluation_previous_goal: Some("partially done".into()),
                memory: Some("remembered fact".into()),
                next_goal: "continue".into(),
                tab_decision: TabDecision::stay(),
                action: Action::Wait { seconds: 1.0 },
            },
            result: ActionResult::ok("waited"),
            duration_ms: 5,
        }
    }

    #[test]
    fn only_the_last_n_steps_are_emitted_in_full() {
        let steps: Vec<_> = (1..=8).map(step).collect();
        let rendered = format_history(&steps, 3);
        assert!(!rendered.contains("<step_5>"));
        assert!(rendered.contains("<step_6>"));
        assert!(rendered.contains("<step_8>"));
    }

    #[test]
    fn preamble_is_always_present() {
        let rendered = format_history(&[], 10);
        assert!(rendered.contains("<s>Agent initialized</s>"));
    }
}
