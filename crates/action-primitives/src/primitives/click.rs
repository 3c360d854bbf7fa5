use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{Driver, DriverOutcome, PageId};
use core_types::{DOMState, LocatorFallback};

use crate::locator_exec::try_candidates;
use crate::PrimitiveError;

/// Clicks element `index`, walking the locator fallback chain until one
/// candidate resolves or the chain is exhausted.
pub async fn click(
    driver: &Arc<dyn Driver>,
    page: PageId,
    index: u32,
    dom_state: &DOMState,
    fallback: &LocatorFallback,
    timeout: Duration,
) -> Result<DriverOutcome, PrimitiveError> {
    let chain = action_locator::build_chain(index, dom_state, fallback);
    try_candidates(index, &chain, |candidate| {
        driver.click(page, &candidate.selector, timeout)
    })
    .await
}
