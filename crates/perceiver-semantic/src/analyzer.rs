//! The semantic element analyzer: scores a DOMElement against every
//! rule, picks the winner above threshold, and emits a decorative
//! classification used only to enrich the prompt text the message manager
//! builds — the agent's decisions never depend on this output.

use core_types::DOMElement;

use crate::rule::{Priority, Rule, SemanticType, MATCH_THRESHOLD};
use crate::rules_table::default_rules;

#[derive(Clone, Debug)]
pub struct SemanticClassification {
    pub semantic_type: SemanticType,
    pub confidence: f64,
    pub priority: Priority,
    pub is_recommended: bool,
    pub description: String,
    pub action_hint: &'static str,
    pub tags: Vec<String>,
}

pub struct SemanticAnalyzer {
    rules: Vec<Rule>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    pub fn classify(&self, element: &DOMElement) -> SemanticClassification {
        let class = element.attr("class").unwrap_or("");
        let id = element.attr("id").unwrap_or("");
        let href = element.attr("href").unwrap_or("");
        let role = element.attr("role").unwrap_or("");

        let mut best: Option<(&Rule, f64)> = None;
        for rule in &self.rules {
            let score = rule.score(
                &element.tag,
                class,
                id,
                &element.text,
                href,
                role,
                &element.attributes,
            );
            if score >= MATCH_THRESHOLD {
                match best {
                    Some((_, best_score)) if best_score >= score => {}
                    _ => best = Some((rule, score)),
                }
            }
        }

        match best {
            Some((rule, score)) => SemanticClassification {
                semantic_type: rule.semantic_type,
                confidence: score.min(1.0),
                priority: rule.priority,
                is_recommended: rule.is_recommended,
                description: format!(
                    "{} {}",
                    rule.semantic_type.emoji_label(),
                    element.text.trim()
                )
                .trim()
                .to_string(),
                action_hint: rule.semantic_type.action_hint(),
                tags: vec![format!("{:?}", rule.semantic_type)],
            },
            None => SemanticClassification {
                semantic_type: SemanticType::Unknown,
                confidence: 0.3,
                priority: Priority::medium(),
                is_recommended: false,
                description: element.text.trim().to_string(),
                action_hint: SemanticType::Unknown.action_hint(),
                tags: Vec::new(),
            },
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::InteractionType;
    use std::collections::HashMap;

    fn element(tag: &str, attrs: &[(&str, &str)], text: &str) -> DOMElement {
        let mut attributes = HashMap::new();
        for (k, v) in attrs {
            attributes.insert(k.to_string(), v.to_string());
        }
        DOMElement {
            index: 0,
            tag: tag.to_string(),
            text: text.to_string(),
            attributes,
            xpath: "/x".to_string(),
            is_clickable: true,
            is_visible: true,
            interaction_type: InteractionType::Click,
        }
    }

    #[test]
    fn classifies_search_input() {
        let analyzer = SemanticAnalyzer::new();
        let el = element("input", &[("type", "search"), ("placeholder", "Search products")], "");
        let result = analyzer.classify(&el);
        assert_eq!(result.semantic_type, SemanticType::SearchInput);
        assert!(result.confidence >= MATCH_THRESHOLD);
    }

    #[test]
    fn classifies_submit_button_by_text_and_type() {
        let analyzer = SemanticAnalyzer::new();
        let el = element("button", &[("type", "submit")], "Submit");
        let result = analyzer.classify(&el);
        assert_eq!(result.semantic_type, SemanticType::SubmitButton);
    }

    #[test]
    fn falls_back_to_unknown_below_threshold() {
        let analyzer = SemanticAnalyzer::new();
        let el = element("div", &[], "some unrelated text");
        let result = analyzer.classify(&el);
        assert_eq!(result.semantic_type, SemanticType::Unknown);
        assert_eq!(result.confidence, 0.3);
    }
}
