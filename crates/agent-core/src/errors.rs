use thiserror::Error;

/// Errors emitted by the agent-core crate. Everything else the loop
/// encounters (element not found, navigation, plugin failure, ...) is
/// folded into a failed `ActionStep` rather than raised here — nothing but
/// a critical or programmer-error condition crosses `run()`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("browser session failed to start: {0}")]
    SessionStart(String),

    #[error("model manager exhausted all endpoints: {0}")]
    ModelUnavailable(String),

    #[error("agent loop is already running")]
    AlreadyRunning,
}
