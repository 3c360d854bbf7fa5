use std::sync::Arc;

use cdp_adapter::{Driver, PageId};
use core_types::{DOMState, LocatorFallback};

use crate::locator_exec::try_candidates;
use crate::PrimitiveError;

pub async fn hover(
    driver: &Arc<dyn Driver>,
    page: PageId,
    index: u32,
    dom_state: &DOMState,
    fallback: &LocatorFallback,
) -> Result<(), PrimitiveError> {
    let chain = action_locator::build_chain(index, dom_state, fallback);
    try_candidates(index, &chain, |candidate| driver.hover(page, &candidate.selector)).await
}
