//! Parses the snapshot script's JSON output into a [`core_types::DOMState`].

use std::collections::HashMap;

use core_types::{DOMElement, DOMState, InteractionType};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct RawNode {
    tag: String,
    text: String,
    attributes: HashMap<String, String>,
    xpath: String,
    #[serde(rename = "isVisible")]
    is_visible: bool,
    #[serde(rename = "isTopElement")]
    is_top_element: bool,
    #[serde(rename = "isInteractive")]
    is_interactive: bool,
    #[serde(rename = "isInViewport")]
    is_in_viewport: bool,
    #[serde(rename = "interactionType")]
    interaction_type: String,
    #[serde(rename = "highlightIndex")]
    highlight_index: Option<u32>,
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[allow(dead_code)]
    #[serde(rename = "rootId")]
    root_id: Option<String>,
    map: HashMap<String, RawNode>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("duplicate highlight index {0} in snapshot output")]
    DuplicateIndex(u32),
}

/// Configuration for building a [`DOMState`] from raw snapshot JSON, mirroring
/// the options passed into the injected script.
#[derive(Clone, Debug)]
pub struct SnapshotConfig {
    pub highlight: bool,
    pub focus_index: Option<u32>,
    pub viewport_expansion: i32,
    pub debug_mode: bool,
    pub max_elements: usize,
    pub max_element_text_length: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            highlight: false,
            focus_index: None,
            viewport_expansion: 0,
            debug_mode: false,
            max_elements: 500,
            max_element_text_length: 100,
        }
    }
}

impl SnapshotConfig {
    pub fn to_options_json(&self) -> String {
        serde_json::json!({
            "highlight": self.highlight,
            "focusIndex": self.focus_index,
            "viewportExpansion": self.viewport_expansion,
            "debugMode": self.debug_mode,
        })
        .to_string()
    }
}

fn parse_interaction_type(raw: &str) -> InteractionType {
    match raw {
        "input" => InteractionType::Input,
        "click" => InteractionType::Click,
        "interactive" => InteractionType::Interactive,
        "cf-checkbox" => InteractionType::CfCheckbox,
        "cf-container" => InteractionType::CfContainer,
        _ => InteractionType::None,
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{truncated}...")
    }
}

/// Builds a [`DOMState`] from the raw JSON a snapshot script evaluation
/// returned, plus the page metadata the driver reports separately.
///
/// Only nodes carrying a `highlightIndex` become `DOMElement`s — the script
/// already restricted that assignment to interactive + visible + top +
/// in-viewport nodes, so this function does not re-derive clickability, it
/// trusts the flags it's given and just projects them.
pub fn build_dom_state(
    raw_json: &str,
    url: impl Into<String>,
    title: impl Into<String>,
    config: &SnapshotConfig,
) -> Result<DOMState, SnapshotError> {
    let raw: RawSnapshot = serde_json::from_str(raw_json)?;

    let mut elements = Vec::new();
    let mut seen_indices = std::collections::HashSet::new();

    let mut entries: Vec<(&String, &RawNode)> = raw.map.iter().collect();
    entries.sort_by_key(|(_, node)| node.highlight_index);

    for (_, node) in entries {
        let Some(index) = node.highlight_index else {
            continue;
        };
        if elements.len() >= config.max_elements {
            break;
        }
        if !seen_indices.insert(index) {
            return Err(SnapshotError::DuplicateIndex(index));
        }

        elements.push(DOMElement {
            index,
            tag: node.tag.clone(),
            text: truncate(&node.text, config.max_element_text_length),
            attributes: node.attributes.clone(),
            xpath: node.xpath.clone(),
            is_clickable: node.is_interactive
                && node.is_visible
                && node.is_top_element
                && node.is_in_viewport,
            is_visible: node.is_visible,
            interaction_type: parse_interaction_type(&node.interaction_type),
        });
    }

    Ok(DOMState {
        elements,
        url: url.into(),
        title: title.into(),
        screenshot: None,
    })
}
