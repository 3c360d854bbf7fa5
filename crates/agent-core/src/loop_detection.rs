//! Loop detection: examines the last 5 steps for degenerate
//! repetition so the loop can force a failed termination rather than
//! oscillate indefinitely.

use core_types::Action;

use crate::types::AgentStep;

const RECENT_WINDOW: usize = 5;

fn recent(history: &[AgentStep]) -> &[AgentStep] {
    let start = history.len().saturating_sub(RECENT_WINDOW);
    &history[start..]
}

/// Identical-action repetition: the candidate would be at least the
/// `(max_similar_actions + 1)`th occurrence of the same action (per
/// `Action::is_repeat_of`) among the recent window — i.e. up to
/// `max_similar_actions` repeats are tolerated before the next one trips.
fn identical_action_repeated(history: &[AgentStep], candidate: &Action, max_similar_actions: u32) -> bool {
    let prior = recent(history)
        .iter()
        .filter(|step| step.output.action.is_repeat_of(candidate))
        .count();
    prior as u32 >= max_similar_actions
}

/// Goal repetition with failure: `next_goal` matches the candidate's goal at
/// least 3 times among the recent window, and `consecutive_failures>1`.
fn goal_repeated_with_failure(history: &[AgentStep], next_goal: &str, consecutive_failures: u32) -> bool {
    if consecutive_failures <= 1 {
        return false;
    }
    let count = recent(history).iter().filter(|step| step.output.next_goal == next_goal).count();
    count >= 3
}

/// Wait-loop: at least 2 wait actions among the recent window and the
/// candidate is also a wait.
fn wait_loop(history: &[AgentStep], candidate: &Action) -> bool {
    if !matches!(candidate, Action::Wait { .. }) {
        return false;
    }
    let waits = recent(history)
        .iter()
        .filter(|step| matches!(step.output.action, Action::Wait { .. }))
        .count();
    waits >= 2
}

/// Evaluation repetition: the same `evaluation_previous_goal` string appears
/// at least twice among the recent window.
fn evaluation_repeated(history: &[AgentStep], evaluation: Option<&str>) -> bool {
    let Some(evaluation) = evaluation else {
        return false;
    };
    let count = recent(history)
        .iter()
        .filter(|step| step.output.evaluation_previous_goal.as_deref() == Some(evaluation))
        .count();
    count >= 2
}

/// True if executing `candidate` (with the given next-goal/evaluation/
/// failure context) would constitute a detected loop.
pub fn is_loop(
    history: &[AgentStep],
    candidate: &Action,
    next_goal: &str,
    evaluation: Option<&str>,
    consecutive_failures: u32,
    max_similar_actions: u32,
) -> bool {
    identical_action_repeated(history, candidate, max_similar_actions)
        || goal_repeated_with_failure(history, next_goal, consecutive_failures)
        || wait_loop(history, candidate)
        || evaluation_repeated(history, evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentOutput, TabDecision};
    use core_types::ActionResult;

    fn step_with(action: Action, next_goal: &str, evaluation: Option<&str>) -> AgentStep {
        AgentStep {
            step_number: 1,
            output: AgentOutput {
                thinking: None,
                evaluation_previous_goal: evaluation.map(String::from),
                memory: None,
                next_goal: next_goal.to_string(),
                tab_decision: TabDecision::stay(),
                action,
            },
            result: ActionResult::ok("done"),
            duration_ms: 10,
        }
    }

    #[test]
    fn third_identical_click_trips_with_max_similar_actions_two() {
        // Scenario 3: two prior click(5) steps, max_similar_actions=2 — the
        // third attempt at the same click is the one that gets short-circuited.
        let click = Action::Click {
            index: 5,
            locator: Default::default(),
        };
        let history = vec![
            step_with(click.clone(), "g", None),
            step_with(click.clone(), "g", None),
        ];
        assert!(is_loop(&history, &click, "g", None, 0, 2));
    }

    #[test]
    fn second_identical_click_does_not_yet_trip_with_max_similar_actions_two() {
        let click = Action::Click {
            index: 5,
            locator: Default::default(),
        };
        let history = vec![step_with(click.clone(), "g", None)];
        assert!(!is_loop(&history, &click, "g", None, 0, 2));
    }

    #[test]
    fn goal_repetition_requires_failures_above_one() {
        let wait = Action::Wait { seconds: 1.0 };
        let history = vec![
            step_with(wait.clone(), "same goal", None),
            step_with(wait.clone(), "same goal", None),
            step_with(wait.clone(), "same goal", None),
        ];
        assert!(!is_loop(&history, &Action::Navigate { url: "x".into() }, "same goal", None, 1, 10));
        assert!(is_loop(&history, &Action::Navigate { url: "x".into() }, "same goal", None, 2, 10));
    }

    #[test]
    fn two_prior_waits_plus_a_third_trip_the_wait_loop() {
        let wait = Action::Wait { seconds: 2.0 };
        let history = vec![
            step_with(Action::Wait { seconds: 0.5 }, "g1", None),
            step_with(Action::Wait { seconds: 0.7 }, "g2", None),
        ];
        assert!(is_loop(&history, &wait, "g3", None, 0, 100));
    }

    #[test]
    fn repeated_evaluation_string_trips_detection() {
        let history = vec![
            step_with(Action::Wait { seconds: 1.0 }, "g1", Some("stuck again")),
            step_with(Action::Wait { seconds: 1.0 }, "g2", Some("stuck again")),
        ];
        assert!(is_loop(
            &history,
            &Action::Navigate { url: "x".into() },
            "g3",
            Some("stuck again"),
            0,
            100
        ));
    }
}
