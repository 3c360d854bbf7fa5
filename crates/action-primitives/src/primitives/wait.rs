use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{Driver, DriverOutcome, ElementWaitState, PageId, WaitUntil};

use crate::PrimitiveError;

/// Pure delay — no driver involvement.
pub async fn wait(seconds: f64) {
    tokio::time::sleep(Duration::from_secs_f64(seconds.max(0.0))).await;
}

pub async fn wait_for_navigation(
    driver: &Arc<dyn Driver>,
    page: PageId,
    timeout: Duration,
    wait_until: WaitUntil,
) -> Result<(), PrimitiveError> {
    driver
        .wait_for_navigation(page, timeout, wait_until)
        .await
        .map_err(Into::into)
}

pub async fn wait_for_element(
    driver: &Arc<dyn Driver>,
    page: PageId,
    selector: &str,
    timeout: Duration,
    state: ElementWaitState,
) -> Result<(), PrimitiveError> {
    driver
        .wait_for_element(page, selector, timeout, state)
        .await
        .map_err(Into::into)
}

pub async fn press_key(
    driver: &Arc<dyn Driver>,
    page: PageId,
    key: &str,
    modifiers: &[String],
    timeout: Duration,
) -> Result<DriverOutcome, PrimitiveError> {
    driver
        .press_key(page, key, modifiers, timeout)
        .await
        .map_err(Into::into)
}
