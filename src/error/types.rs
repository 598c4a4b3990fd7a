use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the pinboard crate.
pub type Result<T> = std::result::Result<T, PinboardError>;

/// Errors surfaced at the edges of the layout engine.
#[derive(Debug, Error)]
pub enum PinboardError {
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error("terminal backend error: {0}")]
    Terminal(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
