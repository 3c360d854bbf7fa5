//! The Browser Session Facade. See [`session::BrowserSession`].

mod config;
mod errors;
mod session;

pub use config::SessionConfig;
pub use errors::SessionError;
pub use session::BrowserSession;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cdp_adapter::{
        CookieParam, Driver, DriverError, DriverOutcome, ElementWaitState as DriverWaitState,
        PageId, TabInfo, WaitUntil as DriverWaitUntil,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// A fake driver returning a fixed one-button DOM snapshot and counting
    /// click attempts, used to prove `BrowserSession::click`'s retry loop and
    /// context-destruction-to-bool mapping without a real browser.
    struct FakeDriver {
        click_attempts: AtomicUsize,
        click_fails_before_success: usize,
        click_destroys_context: bool,
    }

    impl FakeDriver {
        fn new() -> Self {
            Self {
                click_attempts: AtomicUsize::new(0),
                click_fails_before_success: 0,
                click_destroys_context: false,
            }
        }
    }

    const SNAPSHOT_JSON: &str = r#"{"rootId":"n0","map":{
        "n0":{"tag":"button","text":"Go","attributes":{},"xpath":"/html/body/button[1]","isVisible":true,"isTopElement":true,"isInteractive":true,"isInViewport":true,"interactionType":"click","highlightIndex":0,"children":[]}
    }}"#;

    #[async_trait]
    impl Driver for FakeDriver {
        async fn navigate(
            &self,
            _page: PageId,
            _url: &str,
            _timeout: Duration,
        ) -> Result<DriverOutcome, DriverError> {
            Ok(DriverOutcome::default())
        }

        async fn evaluate_script(
            &self,
            _page: PageId,
            script: &str,
        ) -> Result<serde_json::Value, DriverError> {
            if script.contains("location.href") {
                Ok(serde_json::Value::String(
                    r#"{"url":"https://example.test","title":"Example"}"#.to_string(),
                ))
            } else {
                Ok(serde_json::Value::String(SNAPSHOT_JSON.to_string()))
            }
        }

        async fn click(
            &self,
            _page: PageId,
            _selector: &str,
            _timeout: Duration,
        ) -> Result<DriverOutcome, DriverError> {
            let attempt = self.click_attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.click_fails_before_success {
                Err(DriverError::ElementNotFound("not yet".into()))
            } else {
                Ok(DriverOutcome {
                    context_destroyed: self.click_destroys_context,
                })
            }
        }

        async fn type_text(
            &self,
            _page: PageId,
            _selector: &str,
            _text: &str,
            _timeout: Duration,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn press_key(
            &self,
            _page: PageId,
            _key: &str,
            _modifiers: &[String],
            _timeout: Duration,
        ) -> Result<DriverOutcome, DriverError> {
            Ok(DriverOutcome::default())
        }

        async fn scroll(&self, _page: PageId, _dx: i32, _dy: i32) -> Result<(), DriverError> {
            Ok(())
        }

        async fn hover(&self, _page: PageId, _selector: &str) -> Result<(), DriverError> {
            Ok(())
        }

        async fn drag_and_drop(
            &self,
            _page: PageId,
            _source_selector: &str,
            _target_selector: &str,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn select_option(
            &self,
            _page: PageId,
            _selector: &str,
            _value: &str,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn upload_file(
            &self,
            _page: PageId,
            _selector: &str,
            _file_path: &str,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn set_cookie(&self, _page: PageId, _cookie: CookieParam) -> Result<(), DriverError> {
            Ok(())
        }

        async fn go_back(&self, _page: PageId) -> Result<(), DriverError> {
            Ok(())
        }
        async fn go_forward(&self, _page: PageId) -> Result<(), DriverError> {
            Ok(())
        }
        async fn refresh(&self, _page: PageId) -> Result<(), DriverError> {
            Ok(())
        }

        async fn wait_for_navigation(
            &self,
            _page: PageId,
            _timeout: Duration,
            _wait_until: DriverWaitUntil,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn wait_for_element(
            &self,
            _page: PageId,
            _selector: &str,
            _timeout: Duration,
            _state: DriverWaitState,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn new_tab(&self, _url: Option<&str>) -> Result<PageId, DriverError> {
            Ok(PageId::new())
        }
        async fn switch_tab(&self, _tab_id: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn close_tab(&self, _tab_id: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn list_tabs(&self) -> Result<Vec<TabInfo>, DriverError> {
            Ok(vec![])
        }

        async fn take_screenshot(&self, _page: PageId) -> Result<String, DriverError> {
            Ok("base64data".to_string())
        }
    }

    #[tokio::test]
    async fn operations_fail_before_start() {
        let driver: Arc<dyn Driver> = Arc::new(FakeDriver::new());
        let session = BrowserSession::new(driver, SessionConfig::default());
        let result = session.get_dom_state().await;
        assert!(matches!(result, Err(SessionError::NoActivePage)));
    }

    #[tokio::test]
    async fn start_then_get_dom_state_returns_the_snapshot() {
        let driver: Arc<dyn Driver> = Arc::new(FakeDriver::new());
        let session = BrowserSession::new(driver, SessionConfig::default());
        session.start().await.unwrap();
        let state = session.get_dom_state().await.unwrap();
        assert_eq!(state.url, "https://example.test");
        assert_eq!(state.elements.len(), 1);
    }

    #[tokio::test]
    async fn click_retries_and_eventually_succeeds() {
        let driver = Arc::new(FakeDriver {
            click_attempts: AtomicUsize::new(0),
            click_fails_before_success: 1,
            click_destroys_context: false,
        });
        let driver: Arc<dyn Driver> = driver;
        let session = BrowserSession::new(driver, SessionConfig::default());
        session.start().await.unwrap();
        let state = session.get_dom_state().await.unwrap();
        let navigated = session
            .click(0, &state, &core_types::LocatorFallback::default())
            .await
            .unwrap();
        assert!(!navigated);
    }

    #[tokio::test]
    async fn click_reports_navigation_on_context_destruction() {
        let driver: Arc<dyn Driver> = Arc::new(FakeDriver {
            click_attempts: AtomicUsize::new(0),
            click_fails_before_success: 0,
            click_destroys_context: true,
        });
        let session = BrowserSession::new(driver, SessionConfig::default());
        session.start().await.unwrap();
        let state = session.get_dom_state().await.unwrap();
        let navigated = session
            .click(0, &state, &core_types::LocatorFallback::default())
            .await
            .unwrap();
        assert!(navigated);
    }
}
