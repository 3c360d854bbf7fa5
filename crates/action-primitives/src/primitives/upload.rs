use std::sync::Arc;

use cdp_adapter::{Driver, PageId};
use core_types::{DOMState, LocatorFallback};

use crate::locator_exec::try_candidates;
use crate::PrimitiveError;

pub async fn upload_file(
    driver: &Arc<dyn Driver>,
    page: PageId,
    index: u32,
    file_path: &str,
    dom_state: &DOMState,
    fallback: &LocatorFallback,
) -> Result<(), PrimitiveError> {
    let chain = action_locator::build_chain(index, dom_state, fallback);
    try_candidates(index, &chain, |candidate| {
        driver.upload_file(page, &candidate.selector, file_path)
    })
    .await
}
