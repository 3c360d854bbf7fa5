use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum PrimitiveError {
    #[error("no locator candidates available for element index {0}")]
    NoCandidates(u32),
    #[error("element not found: {0}")]
    NotFound(String),
    #[error("element not clickable: {0}")]
    NotClickable(String),
    #[error("driver error: {0}")]
    Driver(String),
}

impl From<cdp_adapter::DriverError> for PrimitiveError {
    fn from(err: cdp_adapter::DriverError) -> Self {
        match err {
            cdp_adapter::DriverError::ElementNotFound(s) => PrimitiveError::NotFound(s),
            cdp_adapter::DriverError::ElementNotClickable(s) => PrimitiveError::NotClickable(s),
            other => PrimitiveError::Driver(other.to_string()),
        }
    }
}
