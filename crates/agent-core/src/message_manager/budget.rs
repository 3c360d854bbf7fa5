//! Budgeting: estimates token count as `⌈chars/4⌉`; when the estimate
//! exceeds the context window, the history portion (not the current state)
//! is trimmed to its last 70%.

pub fn estimate_tokens(text: &str) -> usize {
    (text.chars().count() + 3) / 4
}

/// Trims `history` to its last 70% (by character count) when `history` plus
/// `current_state` together exceed `context_window_tokens`. `current_state`
/// is never trimmed.
pub fn trim_history_to_budget(history: &str, current_state: &str, context_window_tokens: usize) -> String {
    let total = estimate_tokens(history) + estimate_tokens(current_state);
    if total <= context_window_tokens {
        return history.to_string();
    }
    let char_count = history.chars().count();
    let drop = char_count - (char_count * 7 / 10);
    history.chars().skip(drop).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn under_budget_history_is_untouched() {
        let history = "short history";
        let trimmed = trim_history_to_budget(history, "current state", 10_000);
        assert_eq!(trimmed, history);
    }

    #[test]
    fn over_budget_history_is_trimmed_to_its_tail() {
        let history = "x".repeat(4000);
        let trimmed = trim_history_to_budget(&history, "current state", 10);
        assert!(trimmed.len() < history.len());
        assert!(history.ends_with(&trimmed));
    }
}
