use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ClientError {
    #[error("http transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("provider returned an error: {0}")]
    Provider(String),
    #[error("could not parse provider response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ModelManagerError {
    #[error("no endpoint available (all disabled or unhealthy, and fallback is disabled)")]
    NoAvailableEndpoint,
    #[error("exhausted {attempts} attempt(s); last error: {last_error}")]
    AllRetriesExhausted { attempts: u32, last_error: String },
    #[error(transparent)]
    Client(#[from] ClientError),
}
