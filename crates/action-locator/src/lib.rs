//! Locator fallback chain: given a target element index plus the
//! optional xpath/cssSelector/text/attributes fallback payload an action
//! carries, produces the ordered list of selectors the session tries in
//! turn until one resolves.
//!
//! This crate does not touch the page itself — it only orders candidates
//! from data already in hand (the current `DOMState` and the action's
//! payload). `browser-session` is the one that walks the list against the
//! driver.

use core_types::{DOMState, LocatorFallback};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LocatorStrategy {
    IndexXpath,
    Xpath,
    Css,
    RoleText,
    Attribute,
}

impl LocatorStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::IndexXpath => "index_xpath",
            LocatorStrategy::Xpath => "xpath",
            LocatorStrategy::Css => "css",
            LocatorStrategy::RoleText => "role_text",
            LocatorStrategy::Attribute => "attribute",
        }
    }
}

/// A single resolvable selector and the strategy that produced it.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub strategy: LocatorStrategy,
    /// A CSS selector for `Css`/`RoleText`/`Attribute`/`IndexXpath`-resolved
    /// candidates, or an XPath expression for `Xpath`.
    pub selector: String,
}

fn escape_css_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds the ordered fallback chain for clicking/typing into `index`,
/// combining the live DOM snapshot (for the index-resolved xpath) with
/// whatever fallback locators the action carried.
pub fn build_chain(index: u32, dom_state: &DOMState, fallback: &LocatorFallback) -> Vec<Candidate> {
    let mut chain = Vec::new();

    if let Some(element) = dom_state.element(index) {
        chain.push(Candidate {
            strategy: LocatorStrategy::IndexXpath,
            selector: element.xpath.clone(),
        });
    }

    if let Some(xpath) = &fallback.xpath {
        chain.push(Candidate {
            strategy: LocatorStrategy::Xpath,
            selector: xpath.clone(),
        });
    }

    if let Some(css) = &fallback.css_selector {
        chain.push(Candidate {
            strategy: LocatorStrategy::Css,
            selector: css.clone(),
        });
    }

    if let Some(text) = &fallback.text {
        if let Some(element) = dom_state.element(index) {
            chain.push(Candidate {
                strategy: LocatorStrategy::RoleText,
                selector: format!("{}:contains(\"{}\")", element.tag, escape_css_value(text)),
            });
        }
    }

    for (name, value) in &fallback.attributes {
        chain.push(Candidate {
            strategy: LocatorStrategy::Attribute,
            selector: format!("[{}=\"{}\"]", name, escape_css_value(value)),
        });
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{DOMElement, InteractionType};
    use std::collections::HashMap;

    fn dom_with_button() -> DOMState {
        let mut state = DOMState::empty("https://example.test", "Example");
        state.elements.push(DOMElement {
            index: 3,
            tag: "button".into(),
            text: "Go".into(),
            attributes: HashMap::new(),
            xpath: "/html/body/button[1]".into(),
            is_clickable: true,
            is_visible: true,
            interaction_type: InteractionType::Click,
        });
        state
    }

    #[test]
    fn index_xpath_is_tried_first() {
        let state = dom_with_button();
        let chain = build_chain(3, &state, &LocatorFallback::default());
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].strategy, LocatorStrategy::IndexXpath);
        assert_eq!(chain[0].selector, "/html/body/button[1]");
    }

    #[test]
    fn fallbacks_appended_in_spec_order() {
        let state = dom_with_button();
        let mut attributes = HashMap::new();
        attributes.insert("data-testid".to_string(), "go-button".to_string());
        let fallback = LocatorFallback {
            xpath: Some("//button[1]".into()),
            css_selector: Some(".go-btn".into()),
            text: Some("Go".into()),
            attributes,
        };
        let chain = build_chain(3, &state, &fallback);
        let strategies: Vec<_> = chain.iter().map(|c| c.strategy).collect();
        assert_eq!(
            strategies,
            vec![
                LocatorStrategy::IndexXpath,
                LocatorStrategy::Xpath,
                LocatorStrategy::Css,
                LocatorStrategy::RoleText,
                LocatorStrategy::Attribute,
            ]
        );
    }

    #[test]
    fn missing_index_skips_index_xpath() {
        let state = DOMState::empty("https://example.test", "Example");
        let chain = build_chain(99, &state, &LocatorFallback::default());
        assert!(chain.is_empty());
    }
}
