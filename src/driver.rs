//! A placeholder [`cdp_adapter::Driver`] that fails every call.
//!
//! The browser driver itself is a deliberate Non-goal: this crate specifies
//! and consumes the `Driver` contract but does not implement a concrete CDP
//! or WebDriver client. `NullDriver` lets `navigator run` wire up a complete
//! `AgentLoop` and fail cleanly at the first driver call rather than at
//! construction time, so the rest of the pipeline (config loading, model
//! manager, loop wiring) is still exercised end to end.
use std::time::Duration;

use async_trait::async_trait;
use cdp_adapter::{CookieParam, Driver, DriverError, DriverOutcome, ElementWaitState, PageId, TabInfo, WaitUntil};

pub struct NullDriver;

fn unconfigured() -> DriverError {
    DriverError::Other("no browser driver is configured; this build implements the Driver contract but not a concrete browser client".to_string())
}

#[async_trait]
impl Driver for NullDriver {
    async fn navigate(&self, _page: PageId, _url: &str, _timeout: Duration) -> Result<DriverOutcome, DriverError> {
        Err(unconfigured())
    }
    async fn evaluate_script(&self, _page: PageId, _script: &str) -> Result<serde_json::Value, DriverError> {
        Err(unconfigured())
    }
    async fn click(&self, _page: PageId, _selector: &str, _timeout: Duration) -> Result<DriverOutcome, DriverError> {
        Err(unconfigured())
    }
    async fn type_text(&self, _page: PageId, _selector: &str, _text: &str, _timeout: Duration) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn press_key(&self, _page: PageId, _key: &str, _modifiers: &[String], _timeout: Duration) -> Result<DriverOutcome, DriverError> {
        Err(unconfigured())
    }
    async fn scroll(&self, _page: PageId, _dx: i32, _dy: i32) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn hover(&self, _page: PageId, _selector: &str) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn drag_and_drop(&self, _page: PageId, _source_selector: &str, _target_selector: &str) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn select_option(&self, _page: PageId, _selector: &str, _value: &str) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn upload_file(&self, _page: PageId, _selector: &str, _file_path: &str) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn set_cookie(&self, _page: PageId, _cookie: CookieParam) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn go_back(&self, _page: PageId) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn go_forward(&self, _page: PageId) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn refresh(&self, _page: PageId) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn wait_for_navigation(&self, _page: PageId, _timeout: Duration, _wait_until: WaitUntil) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn wait_for_element(&self, _page: PageId, _selector: &str, _timeout: Duration, _state: ElementWaitState) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn new_tab(&self, _url: Option<&str>) -> Result<PageId, DriverError> {
        Err(unconfigured())
    }
    async fn switch_tab(&self, _tab_id: &str) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn close_tab(&self, _tab_id: &str) -> Result<(), DriverError> {
        Err(unconfigured())
    }
    async fn list_tabs(&self) -> Result<Vec<TabInfo>, DriverError> {
        Err(unconfigured())
    }
    async fn take_screenshot(&self, _page: PageId) -> Result<String, DriverError> {
        Err(unconfigured())
    }
}
