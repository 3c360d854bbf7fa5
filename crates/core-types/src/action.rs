//! The abstract [`Action`] vocabulary the agent loop decides between, and the
//! [`ActionResult`] the controller reports back after executing one.
//!
//! `Action` is a tagged sum so that adding a variant forces every `match` in
//! the controller to be revisited by the compiler; never add a catch-all arm
//! to an `Action` dispatch.

use std::collections::HashMap;

#[cfg(feature = "serde-full")]
use serde::{Deserialize, Serialize};

/// Locator fallbacks carried alongside an element index. The session facade
/// tries the index-resolved xpath first, then falls through this list in
/// order, so a stale index from a changed page can still be recovered.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-full", serde(default))]
#[derive(Clone, Debug, Default)]
pub struct LocatorFallback {
    pub xpath: Option<String>,
    pub css_selector: Option<String>,
    pub text: Option<String>,
    pub attributes: HashMap<String, String>,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum ScrollDirection {
    Up,
    Down,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum ElementWaitState {
    Visible,
    Hidden,
    Attached,
    Detached,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum WaitUntil {
    Load,
    DomContentLoaded,
    NetworkIdle,
}

/// `position` for a `modify_page` DOM mutation, mirroring the subset of
/// `Element.insertAdjacentElement` anchors plus a whole-node `replace`.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum InsertPosition {
    Before,
    After,
    Inside,
    Replace,
    AfterBegin,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
pub enum DomMutationKind {
    Create,
    Modify,
    Delete,
}

/// A synthesized element description for `create`/`modify` mutations.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    pub tag: Option<String>,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub attributes: HashMap<String, String>,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub styles: HashMap<String, String>,
    pub content: Option<String>,
}

#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct DomModification {
    pub kind: DomMutationKind,
    /// CSS selector or xpath identifying the mutation target.
    pub target: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub position: Option<InsertPosition>,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub element: Option<ElementSpec>,
}

/// The tagged sum of every action the agent loop can decide to take.
///
/// Field names follow `snake_case` to match the JSON schema handed to the
/// model; `#[serde(tag = "type")]` makes the wire shape `{"type": "click", ...}`.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-full", serde(tag = "type", rename_all = "snake_case"))]
pub enum Action {
    Click {
        index: u32,
        #[cfg_attr(feature = "serde-full", serde(flatten))]
        locator: LocatorFallback,
    },
    Type {
        index: u32,
        text: String,
        #[cfg_attr(feature = "serde-full", serde(flatten))]
        locator: LocatorFallback,
    },
    Navigate {
        url: String,
    },
    Scroll {
        direction: ScrollDirection,
        amount: Option<i32>,
    },
    Wait {
        seconds: f64,
    },
    Done {
        message: String,
        success: bool,
    },
    Hover {
        index: u32,
        #[cfg_attr(feature = "serde-full", serde(flatten))]
        locator: LocatorFallback,
    },
    DragDrop {
        source_index: u32,
        target_index: u32,
    },
    KeyPress {
        key: String,
        #[cfg_attr(feature = "serde-full", serde(default))]
        modifiers: Vec<String>,
        #[cfg_attr(feature = "serde-full", serde(default))]
        expect_form_submit: bool,
    },
    Select {
        index: u32,
        value: String,
    },
    UploadFile {
        index: u32,
        file_path: String,
    },
    TakeScreenshot,
    ExtractData {
        #[cfg_attr(feature = "serde-full", serde(default))]
        selector: Option<String>,
        #[cfg_attr(feature = "serde-full", serde(default))]
        description: Option<String>,
    },
    ExecuteScript {
        script: String,
        #[cfg_attr(feature = "serde-full", serde(default))]
        args: Vec<serde_json::Value>,
    },
    SwitchTab {
        tab_id: String,
    },
    NewTab {
        url: Option<String>,
    },
    CloseTab {
        tab_id: Option<String>,
    },
    GoBack,
    GoForward,
    Refresh,
    SetCookie {
        name: String,
        value: String,
        domain: Option<String>,
    },
    WaitForElement {
        selector: String,
        timeout_ms: u64,
        state: ElementWaitState,
    },
    WaitForNavigation {
        timeout_ms: u64,
        wait_until: WaitUntil,
    },
    ExecutePlugin {
        plugin_id: String,
        #[cfg_attr(feature = "serde-full", serde(default))]
        parameters: HashMap<String, serde_json::Value>,
    },
    CreatePageEffect {
        effect_id: String,
        #[cfg_attr(feature = "serde-full", serde(default))]
        parameters: HashMap<String, serde_json::Value>,
    },
    ModifyPage {
        modifications: Vec<DomModification>,
        #[cfg_attr(feature = "serde-full", serde(default))]
        preserve_original: bool,
    },
    WrapPageIframe,
}

impl Action {
    /// The element index this action targets, if any. Used to validate that
    /// the index was present in the DOMState read during the same step (P6).
    pub fn target_index(&self) -> Option<u32> {
        match self {
            Action::Click { index, .. }
            | Action::Type { index, .. }
            | Action::Hover { index, .. }
            | Action::Select { index, .. }
            | Action::UploadFile { index, .. } => Some(*index),
            Action::DragDrop { source_index, .. } => Some(*source_index),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Click { .. } => "click",
            Action::Type { .. } => "type",
            Action::Navigate { .. } => "navigate",
            Action::Scroll { .. } => "scroll",
            Action::Wait { .. } => "wait",
            Action::Done { .. } => "done",
            Action::Hover { .. } => "hover",
            Action::DragDrop { .. } => "drag_drop",
            Action::KeyPress { .. } => "key_press",
            Action::Select { .. } => "select",
            Action::UploadFile { .. } => "upload_file",
            Action::TakeScreenshot => "take_screenshot",
            Action::ExtractData { .. } => "extract_data",
            Action::ExecuteScript { .. } => "execute_script",
            Action::SwitchTab { .. } => "switch_tab",
            Action::NewTab { .. } => "new_tab",
            Action::CloseTab { .. } => "close_tab",
            Action::GoBack => "go_back",
            Action::GoForward => "go_forward",
            Action::Refresh => "refresh",
            Action::SetCookie { .. } => "set_cookie",
            Action::WaitForElement { .. } => "wait_for_element",
            Action::WaitForNavigation { .. } => "wait_for_navigation",
            Action::ExecutePlugin { .. } => "execute_plugin",
            Action::CreatePageEffect { .. } => "create_page_effect",
            Action::ModifyPage { .. } => "modify_page",
            Action::WrapPageIframe => "wrap_page_iframe",
        }
    }

    /// Equality used by loop detection: two actions of different types are
    /// never equal, and the notion of "same action" is specific to each
    /// variant rather than a blanket struct comparison.
    pub fn is_repeat_of(&self, other: &Action) -> bool {
        match (self, other) {
            (Action::Click { index: a, .. }, Action::Click { index: b, .. }) => a == b,
            (
                Action::Type { index: a, text: ta, .. },
                Action::Type { index: b, text: tb, .. },
            ) => a == b && ta == tb,
            (Action::Navigate { url: a }, Action::Navigate { url: b }) => a == b,
            (Action::Scroll { direction: a, .. }, Action::Scroll { direction: b, .. }) => a == b,
            (Action::Wait { seconds: a }, Action::Wait { seconds: b }) => {
                (a - b).abs() < f64::EPSILON
            }
            _ => false,
        }
    }
}

/// Timing and provenance metadata attached to an [`ActionResult`].
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct ActionResultMetadata {
    pub duration_ms: Option<u64>,
    pub timestamp: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Outcome of executing one [`Action`] via the controller.
#[cfg_attr(feature = "serde-full", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct ActionResult {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub extracted_content: Option<String>,
    pub screenshot: Option<String>,
    /// Set when the driver reported (or the controller inferred from an
    /// execution-context-destroyed error) that this action caused navigation.
    pub navigation_detected: Option<bool>,
    pub metadata: Option<ActionResultMetadata>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_navigation(mut self, navigated: bool) -> Self {
        self.navigation_detected = Some(navigated);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_repeats_compare_by_index_only() {
        let a = Action::Click {
            index: 3,
            locator: LocatorFallback::default(),
        };
        let b = Action::Click {
            index: 3,
            locator: LocatorFallback {
                xpath: Some("//button".into()),
                ..Default::default()
            },
        };
        assert!(a.is_repeat_of(&b));
    }

    #[test]
    fn type_repeats_require_same_text() {
        let a = Action::Type {
            index: 1,
            text: "hello".into(),
            locator: LocatorFallback::default(),
        };
        let b = Action::Type {
            index: 1,
            text: "world".into(),
            locator: LocatorFallback::default(),
        };
        assert!(!a.is_repeat_of(&b));
    }

    #[test]
    fn different_variants_never_repeat() {
        let a = Action::Wait { seconds: 1.0 };
        let b = Action::Navigate {
            url: "https://example.test".into(),
        };
        assert!(!a.is_repeat_of(&b));
    }
}
