use std::time::Duration;

/// Timeouts and retry counts for the primitives `BrowserSession` wraps.
/// Mirrors the per-action timeout knobs a driver call needs.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub click_timeout: Duration,
    pub type_timeout: Duration,
    pub key_press_timeout: Duration,
    pub navigate_timeout: Duration,
    pub wait_for_navigation_timeout: Duration,
    pub wait_for_element_timeout: Duration,
    /// Number of times a click/type is retried end-to-end (full locator
    /// chain exhausted each attempt) before giving up.
    pub retry_count: u32,
    pub retry_backoff: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            click_timeout: Duration::from_secs(10),
            type_timeout: Duration::from_secs(10),
            key_press_timeout: Duration::from_secs(10),
            navigate_timeout: Duration::from_secs(30),
            wait_for_navigation_timeout: Duration::from_secs(30),
            wait_for_element_timeout: Duration::from_secs(10),
            retry_count: 2,
            retry_backoff: Duration::from_millis(300),
        }
    }
}
