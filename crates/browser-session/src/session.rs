//! The Browser Session Facade: a stable capability set over the
//! driver that hides retry and locator-fallback plumbing from the
//! controller. One `BrowserSession` owns one driver and tracks the
//! currently-focused page; the controller never talks to `cdp_adapter`
//! directly.

use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{Driver, DriverOutcome, PageId, TabInfo};
use core_types::{DOMState, ElementWaitState, LocatorFallback, ScrollDirection, WaitUntil};
use tokio::sync::RwLock;

use perceiver_structural::{SnapshotConfig, Snapshotter};

use crate::config::SessionConfig;
use crate::errors::SessionError;

fn map_wait_state(state: ElementWaitState) -> cdp_adapter::ElementWaitState {
    match state {
        ElementWaitState::Visible => cdp_adapter::ElementWaitState::Visible,
        ElementWaitState::Hidden => cdp_adapter::ElementWaitState::Hidden,
        ElementWaitState::Attached => cdp_adapter::ElementWaitState::Attached,
        ElementWaitState::Detached => cdp_adapter::ElementWaitState::Detached,
    }
}

fn map_wait_until(wait_until: &WaitUntil) -> cdp_adapter::WaitUntil {
    match wait_until {
        WaitUntil::Load => cdp_adapter::WaitUntil::Load,
        WaitUntil::DomContentLoaded => cdp_adapter::WaitUntil::DomContentLoaded,
        WaitUntil::NetworkIdle => cdp_adapter::WaitUntil::NetworkIdle,
    }
}

/// Reads `location.href`/`document.title` in one round trip so `getDOMState`
/// doesn't need the caller to supply them.
async fn read_page_identity(driver: &Arc<dyn Driver>, page: PageId) -> Result<(String, String), SessionError> {
    let raw = driver
        .evaluate_script(
            page,
            "JSON.stringify({url: location.href, title: document.title})",
        )
        .await?;
    let raw_str = raw.as_str().unwrap_or("{}");
    let parsed: serde_json::Value = serde_json::from_str(raw_str).unwrap_or_default();
    let url = parsed
        .get("url")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let title = parsed
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Ok((url, title))
}

pub struct BrowserSession {
    driver: Arc<dyn Driver>,
    snapshotter: Snapshotter,
    config: SessionConfig,
    current_page: RwLock<Option<PageId>>,
}

impl BrowserSession {
    pub fn new(driver: Arc<dyn Driver>, config: SessionConfig) -> Self {
        let snapshotter = Snapshotter::new(driver.clone(), SnapshotConfig::default());
        Self {
            driver,
            snapshotter,
            config,
            current_page: RwLock::new(None),
        }
    }

    async fn page(&self) -> Result<PageId, SessionError> {
        self.current_page.read().await.ok_or(SessionError::NoActivePage)
    }

    /// Opens the initial tab and makes it the focused page.
    pub async fn start(&self) -> Result<(), SessionError> {
        let page = action_primitives::new_tab(&self.driver, None).await?;
        *self.current_page.write().await = Some(page);
        Ok(())
    }

    pub async fn close(&self) -> Result<(), SessionError> {
        let page = self.page().await?;
        action_primitives::close_tab(&self.driver, &page.0.to_string()).await?;
        *self.current_page.write().await = None;
        Ok(())
    }

    pub async fn navigate(&self, url: &str) -> Result<DriverOutcome, SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::navigate(&self.driver, page, url, self.config.navigate_timeout).await?)
    }

    /// Builds the indexed interactive-element snapshot for the current page.
    pub async fn get_dom_state(&self) -> Result<DOMState, SessionError> {
        let page = self.page().await?;
        let (url, title) = read_page_identity(&self.driver, page).await?;
        Ok(self.snapshotter.capture(page, url, title).await?)
    }

    pub async fn take_screenshot(&self) -> Result<String, SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::take_screenshot(&self.driver, page).await?)
    }

    /// Clicks `index`, retrying the whole locator chain up to
    /// `config.retry_count` times. Returns whether the click destroyed the
    /// execution context (interpreted by the caller as navigation).
    pub async fn click(
        &self,
        index: u32,
        dom_state: &DOMState,
        fallback: &LocatorFallback,
    ) -> Result<bool, SessionError> {
        let page = self.page().await?;
        let mut last_err = None;
        for attempt in 0..=self.config.retry_count {
            match action_primitives::click(
                &self.driver,
                page,
                index,
                dom_state,
                fallback,
                self.config.click_timeout,
            )
            .await
            {
                Ok(outcome) => return Ok(outcome.context_destroyed),
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "click attempt failed");
                    last_err = Some(err);
                    if attempt < self.config.retry_count {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
            }
        }
        Err(last_err.expect("loop runs at least once").into())
    }

    pub async fn type_text(
        &self,
        index: u32,
        text: &str,
        dom_state: &DOMState,
        fallback: &LocatorFallback,
    ) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::type_text(
            &self.driver,
            page,
            index,
            text,
            dom_state,
            fallback,
            self.config.type_timeout,
        )
        .await?)
    }

    pub async fn press_key(
        &self,
        key: &str,
        modifiers: &[String],
    ) -> Result<bool, SessionError> {
        let page = self.page().await?;
        let outcome =
            action_primitives::press_key(&self.driver, page, key, modifiers, self.config.key_press_timeout)
                .await?;
        Ok(outcome.context_destroyed)
    }

    pub async fn scroll(&self, direction: ScrollDirection, amount: Option<i32>) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::scroll(&self.driver, page, direction, amount).await?)
    }

    pub async fn hover(&self, index: u32, dom_state: &DOMState, fallback: &LocatorFallback) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::hover(&self.driver, page, index, dom_state, fallback).await?)
    }

    pub async fn drag_and_drop(
        &self,
        source_index: u32,
        target_index: u32,
        dom_state: &DOMState,
        source_fallback: &LocatorFallback,
        target_fallback: &LocatorFallback,
    ) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::drag_and_drop(
            &self.driver,
            page,
            source_index,
            target_index,
            dom_state,
            source_fallback,
            target_fallback,
        )
        .await?)
    }

    pub async fn select_option(
        &self,
        index: u32,
        value: &str,
        dom_state: &DOMState,
        fallback: &LocatorFallback,
    ) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::select_option(&self.driver, page, index, value, dom_state, fallback).await?)
    }

    pub async fn upload_file(
        &self,
        index: u32,
        file_path: &str,
        dom_state: &DOMState,
        fallback: &LocatorFallback,
    ) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::upload_file(&self.driver, page, index, file_path, dom_state, fallback).await?)
    }

    pub async fn set_cookie(&self, name: &str, value: &str, domain: Option<String>) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::set_cookie(&self.driver, page, name, value, domain).await?)
    }

    pub async fn go_back(&self) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::go_back(&self.driver, page).await?)
    }

    pub async fn go_forward(&self) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::go_forward(&self.driver, page).await?)
    }

    pub async fn refresh(&self) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::refresh(&self.driver, page).await?)
    }

    pub async fn wait_for_navigation(&self, timeout: Duration, wait_until: WaitUntil) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::wait_for_navigation(&self.driver, page, timeout, map_wait_until(&wait_until)).await?)
    }

    pub async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
        state: ElementWaitState,
    ) -> Result<(), SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::wait_for_element(&self.driver, page, selector, timeout, map_wait_state(state)).await?)
    }

    pub async fn new_tab(&self, url: Option<&str>) -> Result<(), SessionError> {
        let page = action_primitives::new_tab(&self.driver, url).await?;
        *self.current_page.write().await = Some(page);
        Ok(())
    }

    pub async fn switch_tab(&self, tab_id: &str) -> Result<(), SessionError> {
        action_primitives::switch_tab(&self.driver, tab_id).await?;
        if let Ok(uuid) = uuid::Uuid::parse_str(tab_id) {
            *self.current_page.write().await = Some(PageId(uuid));
        }
        Ok(())
    }

    pub async fn close_tab(&self, tab_id: &str) -> Result<(), SessionError> {
        Ok(action_primitives::close_tab(&self.driver, tab_id).await?)
    }

    pub async fn get_all_tabs_info(&self) -> Result<Vec<TabInfo>, SessionError> {
        Ok(action_primitives::list_tabs(&self.driver).await?)
    }

    pub async fn execute_script(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        let page = self.page().await?;
        Ok(action_primitives::execute_script(&self.driver, page, script).await?)
    }

    /// Exposed so `action-flow`/`plugin-manager` can set a cookie without
    /// going through the full `set_cookie` wrapper's defaults, or inspect
    /// the current page for diagnostics.
    pub async fn current_page(&self) -> Result<PageId, SessionError> {
        self.page().await
    }
}
