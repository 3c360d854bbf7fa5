//! Message Manager: keeps the prompt within a context-window budget
//! while preserving continuity — history formatting, element rendering,
//! token budgeting, and advisory pattern analysis.

mod budget;
mod elements;
mod history;
mod pattern;

pub use pattern::{analyze as analyze_patterns, PatternSummary};

use cdp_adapter::TabInfo;
use core_types::DOMState;
use perceiver_semantic::SemanticAnalyzer;

use crate::types::AgentStep;

pub struct MessageManager {
    analyzer: SemanticAnalyzer,
}

impl Default for MessageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageManager {
    pub fn new() -> Self {
        Self {
            analyzer: SemanticAnalyzer::new(),
        }
    }

    /// Builds the user-message body for one step's decision request:
    /// formatted history, the current element tree, and the open tabs list.
    pub fn build_user_message(
        &self,
        steps: &[AgentStep],
        dom_state: &DOMState,
        tabs: &[TabInfo],
        max_history_steps: usize,
        max_elements: usize,
        context_window_tokens: usize,
    ) -> String {
        let history_text = history::format_history(steps, max_history_steps);
        let element_tree = elements::format_element_tree(&dom_state.elements, &self.analyzer, max_elements);
        let tabs_text = format_tabs(tabs);

        let current_state = format!(
            "<browser_state>\nurl: {}\ntitle: {}\n{tabs_text}\n<elements>\n{element_tree}\n</elements>\n</browser_state>",
            dom_state.url, dom_state.title,
        );

        let trimmed_history = budget::trim_history_to_budget(&history_text, &current_state, context_window_tokens);

        format!("<history>\n{trimmed_history}\n</history>\n{current_state}")
    }

    pub fn estimate_tokens(&self, text: &str) -> usize {
        budget::estimate_tokens(text)
    }
}

fn format_tabs(tabs: &[TabInfo]) -> String {
    if tabs.is_empty() {
        return "<tabs>\n</tabs>".to_string();
    }
    let rendered: Vec<String> = tabs
        .iter()
        .map(|tab| format!("- id={} title={} url={} active={}", tab.id, tab.title, tab.url, tab.is_active))
        .collect();
    format!("<tabs>\n{}\n</tabs>", rendered.join("\n"))
}
