//! Browser driver contract.
//!
//! This crate does not drive a browser. It defines the capability surface a
//! driver must expose — the primitives enumerated as "Driver contract
//! (consumed)" — so that `browser-session` can be built and tested against a
//! trait object, with the concrete Chromium DevTools Protocol wiring filled
//! in separately. `chromiumoxide` is named here as the intended concrete
//! implementation but is not wired up by this crate.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod ids {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
    pub struct BrowserId(pub Uuid);

    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
    pub struct PageId(pub Uuid);

    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
    pub struct SessionId(pub Uuid);

    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
    pub struct FrameId(pub Uuid);

    macro_rules! new_impl {
        ($ty:ident) => {
            impl $ty {
                pub fn new() -> Self {
                    Self(Uuid::new_v4())
                }
            }

            impl Default for $ty {
                fn default() -> Self {
                    Self::new()
                }
            }
        };
    }

    new_impl!(BrowserId);
    new_impl!(PageId);
    new_impl!(SessionId);
    new_impl!(FrameId);
}

pub use ids::{BrowserId, FrameId, PageId, SessionId};

/// Substrings the driver contract promises to use (or a driver implementation
/// promises to surface) when the page's JavaScript execution context is
/// invalidated mid-call. `browser-session` and `action-flow` match on these
/// rather than a dedicated error variant because the underlying CDP error
/// text is itself just a string.
pub const CONTEXT_DESTROYED_PATTERNS: &[&str] = &[
    "Execution context was destroyed",
    "Cannot find context with specified id",
    "Protocol error",
];

pub fn looks_like_context_destroyed(message: &str) -> bool {
    CONTEXT_DESTROYED_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

#[derive(Debug, Error, Clone)]
pub enum DriverError {
    #[error("navigation timed out after {0:?}")]
    NavigationTimeout(Duration),
    #[error("element not found: {0}")]
    ElementNotFound(String),
    #[error("element not clickable: {0}")]
    ElementNotClickable(String),
    #[error("tab not found: {0}")]
    TabNotFound(String),
    #[error("driver i/o error: {0}")]
    Io(String),
    #[error("{0}")]
    Other(String),
}

impl DriverError {
    /// True when this error's message matches one of the execution-context-
    /// destroyed substrings a real CDP client raises on navigation.
    pub fn is_context_destroyed(&self) -> bool {
        looks_like_context_destroyed(&self.to_string())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementWaitState {
    Visible,
    Hidden,
    Attached,
    Detached,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WaitUntil {
    Load,
    DomContentLoaded,
    NetworkIdle,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CookieParam {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: String,
    pub title: String,
    pub url: String,
    pub is_active: bool,
}

/// Outcome of a primitive that can trigger navigation. `context_destroyed`
/// is set when the driver observed the execution context die mid-call;
/// `browser-session` folds this into `ActionResult::navigation_detected`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DriverOutcome {
    pub context_destroyed: bool,
}

/// The minimal capability surface a browser driver must expose. One
/// implementor exists per transport (CDP today; a WebDriver bridge could
/// implement the same trait). `browser-session` depends only on this trait,
/// never on a concrete transport.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn navigate(&self, page: PageId, url: &str, timeout: Duration)
        -> Result<DriverOutcome, DriverError>;

    /// Evaluates `script` in the page's main world and returns its JSON
    /// result. This is the only primitive the DOM snapshotter needs: it
    /// evaluates a single self-contained script and reads back JSON.
    async fn evaluate_script(
        &self,
        page: PageId,
        script: &str,
    ) -> Result<serde_json::Value, DriverError>;

    async fn click(
        &self,
        page: PageId,
        selector: &str,
        timeout: Duration,
    ) -> Result<DriverOutcome, DriverError>;

    async fn type_text(
        &self,
        page: PageId,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn press_key(
        &self,
        page: PageId,
        key: &str,
        modifiers: &[String],
        timeout: Duration,
    ) -> Result<DriverOutcome, DriverError>;

    async fn scroll(&self, page: PageId, dx: i32, dy: i32) -> Result<(), DriverError>;

    async fn hover(&self, page: PageId, selector: &str) -> Result<(), DriverError>;

    async fn drag_and_drop(
        &self,
        page: PageId,
        source_selector: &str,
        target_selector: &str,
    ) -> Result<(), DriverError>;

    async fn select_option(
        &self,
        page: PageId,
        selector: &str,
        value: &str,
    ) -> Result<(), DriverError>;

    async fn upload_file(
        &self,
        page: PageId,
        selector: &str,
        file_path: &str,
    ) -> Result<(), DriverError>;

    async fn set_cookie(&self, page: PageId, cookie: CookieParam) -> Result<(), DriverError>;

    async fn go_back(&self, page: PageId) -> Result<(), DriverError>;
    async fn go_forward(&self, page: PageId) -> Result<(), DriverError>;
    async fn refresh(&self, page: PageId) -> Result<(), DriverError>;

    async fn wait_for_navigation(
        &self,
        page: PageId,
        timeout: Duration,
        wait_until: WaitUntil,
    ) -> Result<(), DriverError>;

    async fn wait_for_element(
        &self,
        page: PageId,
        selector: &str,
        timeout: Duration,
        state: ElementWaitState,
    ) -> Result<(), DriverError>;

    async fn new_tab(&self, url: Option<&str>) -> Result<PageId, DriverError>;
    async fn switch_tab(&self, tab_id: &str) -> Result<(), DriverError>;
    async fn close_tab(&self, tab_id: &str) -> Result<(), DriverError>;
    async fn list_tabs(&self) -> Result<Vec<TabInfo>, DriverError>;

    async fn take_screenshot(&self, page: PageId) -> Result<String, DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_context_destroyed_substrings() {
        assert!(looks_like_context_destroyed(
            "Error: Execution context was destroyed"
        ));
        assert!(looks_like_context_destroyed(
            "Protocol error (Runtime.evaluate): foo"
        ));
        assert!(!looks_like_context_destroyed("element not found"));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(ids::PageId::new(), ids::PageId::new());
    }
}
