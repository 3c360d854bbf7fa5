//! Per-action-type browser primitives: one function per `Action`
//! variant that needs a real driver call. Element-targeted primitives walk
//! `action-locator`'s fallback chain via `locator_exec::try_candidates`;
//! everything else calls straight through to `cdp_adapter::Driver`.
//!
//! `browser-session` owns the `Driver` instance and current page/tab state;
//! this crate is stateless and only knows how to perform one action given
//! the state it's handed.

mod errors;
mod locator_exec;
pub mod primitives;

pub use errors::PrimitiveError;

pub use primitives::click::click;
pub use primitives::drag_drop::drag_and_drop;
pub use primitives::hover::hover;
pub use primitives::misc::{
    close_tab, execute_script, list_tabs, new_tab, set_cookie, switch_tab, take_screenshot,
};
pub use primitives::navigate::{go_back, go_forward, navigate, refresh};
pub use primitives::scroll::scroll;
pub use primitives::select::select_option;
pub use primitives::type_text::type_text;
pub use primitives::upload::upload_file;
pub use primitives::wait::{press_key, wait, wait_for_element, wait_for_navigation};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cdp_adapter::{
        CookieParam, Driver, DriverError, DriverOutcome, ElementWaitState, PageId, TabInfo,
        WaitUntil,
    };
    use core_types::{DOMElement, DOMState, InteractionType, LocatorFallback};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// A fake driver whose `click` fails on the first `fail_first_n`
    /// selectors tried, then succeeds — used to prove the fallback chain is
    /// actually walked rather than stopping at the first candidate.
    struct FlakyDriver {
        fail_first_n: usize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Driver for FlakyDriver {
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
            _script: &str,
        ) -> Result<serde_json::Value, DriverError> {
            Ok(serde_json::Value::Null)
        }

        async fn click(
            &self,
            _page: PageId,
            selector: &str,
            _timeout: Duration,
        ) -> Result<DriverOutcome, DriverError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_first_n {
                Err(DriverError::ElementNotFound(selector.to_string()))
            } else {
                Ok(DriverOutcome::default())
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
            _wait_until: WaitUntil,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn wait_for_element(
            &self,
            _page: PageId,
            _selector: &str,
            _timeout: Duration,
            _state: ElementWaitState,
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
            Ok("base64".to_string())
        }
    }

    fn dom_with_button() -> DOMState {
        let mut state = DOMState::empty("https://example.test", "Example");
        state.elements.push(DOMElement {
            index: 0,
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

    #[tokio::test]
    async fn click_falls_through_to_next_candidate() {
        let driver: Arc<dyn Driver> = Arc::new(FlakyDriver {
            fail_first_n: 1,
            attempts: AtomicUsize::new(0),
        });
        let dom_state = dom_with_button();
        let fallback = LocatorFallback {
            css_selector: Some("#go".into()),
            ..Default::default()
        };
        let result = click(
            &driver,
            PageId::new(),
            0,
            &dom_state,
            &fallback,
            Duration::from_secs(1),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn click_with_no_candidates_is_an_error() {
        let driver: Arc<dyn Driver> = Arc::new(FlakyDriver {
            fail_first_n: 0,
            attempts: AtomicUsize::new(0),
        });
        let dom_state = DOMState::empty("https://example.test", "Example");
        let result = click(
            &driver,
            PageId::new(),
            42,
            &dom_state,
            &LocatorFallback::default(),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(PrimitiveError::NoCandidates(42))));
    }

    #[tokio::test]
    async fn click_exhausting_chain_returns_last_error() {
        let driver: Arc<dyn Driver> = Arc::new(FlakyDriver {
            fail_first_n: 99,
            attempts: AtomicUsize::new(0),
        });
        let dom_state = dom_with_button();
        let result = click(
            &driver,
            PageId::new(),
            0,
            &dom_state,
            &LocatorFallback::default(),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(PrimitiveError::NotFound(_))));
    }
}
