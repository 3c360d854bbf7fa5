use std::sync::Arc;

use cdp_adapter::{Driver, DriverError, PageId};
use core_types::{DOMState, LocatorFallback};

use crate::PrimitiveError;

/// Drags `source_index` onto `target_index`. Both ends have their own
/// fallback chain; candidates are tried pairwise (source chain outer, target
/// chain inner) until one pair resolves.
pub async fn drag_and_drop(
    driver: &Arc<dyn Driver>,
    page: PageId,
    source_index: u32,
    target_index: u32,
    dom_state: &DOMState,
    source_fallback: &LocatorFallback,
    target_fallback: &LocatorFallback,
) -> Result<(), PrimitiveError> {
    let source_chain = action_locator::build_chain(source_index, dom_state, source_fallback);
    let target_chain = action_locator::build_chain(target_index, dom_state, target_fallback);

    if source_chain.is_empty() {
        return Err(PrimitiveError::NoCandidates(source_index));
    }
    if target_chain.is_empty() {
        return Err(PrimitiveError::NoCandidates(target_index));
    }

    let mut last_err: Option<DriverError> = None;
    for source in &source_chain {
        for target in &target_chain {
            tracing::debug!(
                source = %source.selector,
                target = %target.selector,
                "trying drag-and-drop candidate pair"
            );
            match driver
                .drag_and_drop(page, &source.selector, &target.selector)
                .await
            {
                Ok(()) => return Ok(()),
                Err(err) => {
                    let retryable = matches!(
                        err,
                        DriverError::ElementNotFound(_) | DriverError::ElementNotClickable(_)
                    );
                    if !retryable {
                        return Err(err.into());
                    }
                    last_err = Some(err);
                }
            }
        }
    }

    Err(last_err
        .map(PrimitiveError::from)
        .unwrap_or(PrimitiveError::NoCandidates(source_index)))
}
