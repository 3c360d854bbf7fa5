//! Walks an `action_locator::Candidate` chain against a `Driver`, trying each
//! candidate in turn and falling through only on the errors a bad selector
//! produces (`ElementNotFound`/`ElementNotClickable`). Any other error (a
//! timeout, a destroyed context) is propagated immediately — retrying a
//! different selector wouldn't fix it.

use std::future::Future;
use std::time::Duration;

use action_locator::Candidate;
use cdp_adapter::{DriverError, PageId};

use crate::PrimitiveError;

async fn is_retryable(err: &DriverError) -> bool {
    matches!(
        err,
        DriverError::ElementNotFound(_) | DriverError::ElementNotClickable(_)
    )
}

/// Tries `attempt` against each candidate in `chain`, in order, stopping at
/// the first success. Returns the last error once the chain is exhausted.
pub async fn try_candidates<'c, T, F, Fut>(
    index: u32,
    chain: &'c [Candidate],
    mut attempt: F,
) -> Result<T, PrimitiveError>
where
    F: FnMut(&'c Candidate) -> Fut,
    Fut: Future<Output = Result<T, DriverError>>,
{
    if chain.is_empty() {
        return Err(PrimitiveError::NoCandidates(index));
    }

    let mut last_err: Option<DriverError> = None;
    for candidate in chain {
        tracing::debug!(
            strategy = candidate.strategy.name(),
            selector = %candidate.selector,
            "trying locator candidate"
        );
        match attempt(candidate).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retryable(&err).await {
                    return Err(err.into());
                }
                last_err = Some(err);
            }
        }
    }

    Err(last_err
        .map(PrimitiveError::from)
        .unwrap_or(PrimitiveError::NoCandidates(index)))
}

pub fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

pub type Page = PageId;
