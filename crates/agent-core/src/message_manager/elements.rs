//! Element rendering: each element becomes
//! `[index] <tag attr="…" …>text…/>` with an optional semantic prefix/postfix,
//! truncated text, and a curated attribute subset.

use core_types::DOMElement;
use perceiver_semantic::{SemanticAnalyzer, SemanticType};

const DEFAULT_TEXT_LIMIT: usize = 30;
const VIDEO_TEXT_LIMIT: usize = 120;
const NAV_LINK_TEXT_LIMIT: usize = 60;
const HREF_LIMIT: usize = 40;

const CURATED_ATTRIBUTES: &[&str] = &["type", "name", "role", "aria-label", "placeholder", "title", "value"];

pub fn format_element_tree(elements: &[DOMElement], analyzer: &SemanticAnalyzer, max_elements: usize) -> String {
    elements
        .iter()
        .take(max_elements)
        .map(|element| format_element(element, analyzer))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_element(element: &DOMElement, analyzer: &SemanticAnalyzer) -> String {
    let classification = analyzer.classify(element);
    let limit = text_limit_for(classification.semantic_type);
    let text = truncate(element.text.trim(), limit);

    let mut attrs = String::new();
    for name in CURATED_ATTRIBUTES {
        if let Some(value) = element.attr(name) {
            attrs.push_str(&format!(" {name}=\"{value}\""));
        }
    }
    if let Some(href) = element.attr("href") {
        attrs.push_str(&format!(" href=\"{}\"", truncate(href, HREF_LIMIT)));
    }
    if let Some(classes) = filtered_classes(element) {
        attrs.push_str(&format!(" class=\"{classes}\""));
    }

    let prefix = if classification.semantic_type == SemanticType::Unknown {
        String::new()
    } else {
        format!("{} ", classification.semantic_type.emoji_label())
    };

    format!(
        "[{index}] {prefix}<{tag}{attrs}>{text}…/>",
        index = element.index,
        tag = element.tag,
    )
}

fn text_limit_for(semantic_type: SemanticType) -> usize {
    match semantic_type {
        SemanticType::VideoContent => VIDEO_TEXT_LIMIT,
        SemanticType::NavigationLink => NAV_LINK_TEXT_LIMIT,
        _ => DEFAULT_TEXT_LIMIT,
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}

/// Drops obviously generated/noise class tokens (hashed CSS modules,
/// `ng-`/`js-` framework hooks) and keeps the rest, space-joined.
fn filtered_classes(element: &DOMElement) -> Option<String> {
    let class = element.attr("class")?;
    let kept: Vec<&str> = class
        .split_whitespace()
        .filter(|token| !token.starts_with("ng-") && !token.starts_with("js-") && !looks_hashed(token))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

fn looks_hashed(token: &str) -> bool {
    token.len() > 12 && token.chars().any(|c| c.is_ascii_digit())
}
