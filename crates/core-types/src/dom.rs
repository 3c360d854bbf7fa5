//! DOM snapshot types: [`DOMElement`] and [`DOMState`].
//!
//! A `DOMState` is produced once per perception step by the DOM snapshotter
//! and is immutable afterwards. Element indices are only meaningful within
//! the `DOMState` that produced them; any action that mutates the page
//! invalidates every index from the previous snapshot.

use std::collections::HashMap;

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};

/// How an element can be interacted with.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum InteractionType {
    /// Accepts typed text (inputs, textareas, contenteditable).
    Input,
    /// Responds to a click (buttons, links, role=button, ...).
    Click,
    /// Interactive but neither a pure click nor pure text target (selects, sliders, ...).
    Interactive,
    /// Present in the snapshot but not actionable (used for opaque iframe placeholders).
    None,
    /// Synthetic checkbox target synthesized for a cross-origin Cloudflare challenge iframe.
    #[cfg_attr(feature = "serde-full", serde(rename = "cf-checkbox"))]
    CfCheckbox,
    /// Synthetic container target synthesized for a cross-origin Cloudflare challenge iframe.
    #[cfg_attr(feature = "serde-full", serde(rename = "cf-container"))]
    CfContainer,
}

/// A single interactive (or otherwise notable) node captured by a DOM snapshot.
///
/// `index` is assigned in traversal order to interactive + visible + in-viewport
/// nodes only; it is stable for the lifetime of the snapshot that produced it and
/// meaningless outside it.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct DOMElement {
    pub index: u32,
    pub tag: String,
    /// Trimmed visible text content.
    pub text: String,
    pub attributes: HashMap<String, String>,
    /// Absolute xpath from document root, used as the primary locator.
    pub xpath: String,
    pub is_clickable: bool,
    pub is_visible: bool,
    pub interaction_type: InteractionType,
}

impl DOMElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }
}

/// An immutable snapshot of a page's interactive surface at one point in time.
///
/// Invariant: every `DOMElement::index` within `elements` is unique.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct DOMState {
    pub elements: Vec<DOMElement>,
    pub url: String,
    pub title: String,
    /// Reference to a captured screenshot (e.g. a cache key or base64 payload),
    /// populated only when the agent loop has vision enabled for this step.
    pub screenshot: Option<String>,
}

impl DOMState {
    pub fn empty(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            elements: Vec::new(),
            url: url.into(),
            title: title.into(),
            screenshot: None,
        }
    }

    pub fn element(&self, index: u32) -> Option<&DOMElement> {
        self.elements.iter().find(|e| e.index == index)
    }

    /// Validates the snapshot invariant that every index is unique.
    /// Snapshotters should call this once after assembling a state; it is
    /// cheap relative to the DOM traversal that produced the elements.
    pub fn has_unique_indices(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.elements.iter().all(|e| seen.insert(e.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(index: u32) -> DOMElement {
        DOMElement {
            index,
            tag: "button".to_string(),
            text: "Submit".to_string(),
            attributes: HashMap::new(),
            xpath: format!("/html/body/button[{index}]"),
            is_clickable: true,
            is_visible: true,
            interaction_type: InteractionType::Click,
        }
    }

    #[test]
    fn detects_duplicate_indices() {
        let mut state = DOMState::empty("https://example.test", "Example");
        state.elements.push(element(0));
        state.elements.push(element(0));
        assert!(!state.has_unique_indices());
    }

    #[test]
    fn unique_indices_pass() {
        let mut state = DOMState::empty("https://example.test", "Example");
        state.elements.push(element(0));
        state.elements.push(element(1));
        assert!(state.has_unique_indices());
        assert!(state.element(1).is_some());
        assert!(state.element(2).is_none());
    }
}
