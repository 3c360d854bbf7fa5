//! DOM snapshotter: produces an indexed, immutable [`core_types::DOMState`]
//! from a live page by evaluating a self-contained script in-page and parsing
//! the JSON it returns.

mod builder;
mod script;

pub use builder::{build_dom_state, SnapshotConfig, SnapshotError};
pub use script::{snapshot_script, DENY_LIST_TAGS, INTERACTIVE_ATTRIBUTES, INTERACTIVE_ROLES, INTERACTIVE_TAGS};

use std::sync::Arc;

use cdp_adapter::{ids::PageId, Driver, DriverError};
use core_types::DOMState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("driver returned non-string snapshot result")]
    NotAString,
}

/// Captures [`core_types::DOMState`] snapshots for one page by delegating
/// script evaluation to a [`Driver`]. Stateless across calls; each capture is
/// a fresh evaluation, matching R1 (two snapshots of a static page agree).
pub struct Snapshotter {
    driver: Arc<dyn Driver>,
    config: SnapshotConfig,
}

impl Snapshotter {
    pub fn new(driver: Arc<dyn Driver>, config: SnapshotConfig) -> Self {
        Self { driver, config }
    }

    pub async fn capture(
        &self,
        page: PageId,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<DOMState, CaptureError> {
        let options_json = self.config.to_options_json();
        let script = snapshot_script(&options_json);
        let raw = self.driver.evaluate_script(page, &script).await?;
        let raw_json = raw.as_str().ok_or(CaptureError::NotAString)?;
        tracing::debug!(target: "perceiver_structural", bytes = raw_json.len(), "captured dom snapshot");
        Ok(build_dom_state(raw_json, url, title, &self.config)?)
    }
}
