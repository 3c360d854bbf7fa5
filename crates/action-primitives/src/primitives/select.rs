use std::sync::Arc;

use cdp_adapter::{Driver, PageId};
use core_types::{DOMState, LocatorFallback};

use crate::locator_exec::try_candidates;
use crate::PrimitiveError;

pub async fn select_option(
    driver: &Arc<dyn Driver>,
    page: PageId,
    index: u32,
    value: &str,
    dom_state: &DOMState,
    fallback: &LocatorFallback,
) -> Result<(), PrimitiveError> {
    let chain = action_locator::build_chain(index, dom_state, fallback);
    try_candidates(index, &chain, |candidate| {
        driver.select_option(page, &candidate.selector, value)
    })
    .await
}
