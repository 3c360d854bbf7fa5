use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Primitive(#[from] action_primitives::PrimitiveError),
    #[error(transparent)]
    Driver(#[from] cdp_adapter::DriverError),
    #[error(transparent)]
    Capture(#[from] perceiver_structural::SnapshotError),
    #[error("snapshot capture failed: {0}")]
    CaptureDriver(String),
    #[error("no active page — call start() first")]
    NoActivePage,
}

impl From<perceiver_structural::CaptureError> for SessionError {
    fn from(err: perceiver_structural::CaptureError) -> Self {
        match err {
            perceiver_structural::CaptureError::Driver(e) => SessionError::Driver(e),
            perceiver_structural::CaptureError::Snapshot(e) => SessionError::Capture(e),
            perceiver_structural::CaptureError::NotAString => {
                SessionError::CaptureDriver("snapshot script returned a non-string result".into())
            }
        }
    }
}
