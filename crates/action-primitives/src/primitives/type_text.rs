use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{Driver, PageId};
use core_types::{DOMState, LocatorFallback};

use crate::locator_exec::try_candidates;
use crate::PrimitiveError;

/// Types `text` into element `index`, walking the locator fallback chain.
pub async fn type_text(
    driver: &Arc<dyn Driver>,
    page: PageId,
    index: u32,
    text: &str,
    dom_state: &DOMState,
    fallback: &LocatorFallback,
    timeout: Duration,
) -> Result<(), PrimitiveError> {
    let chain = action_locator::build_chain(index, dom_state, fallback);
    try_candidates(index, &chain, |candidate| {
        driver.type_text(page, &candidate.selector, text, timeout)
    })
    .await
}
