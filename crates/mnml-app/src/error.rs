//! Application error types.

use thiserror::Error;

/// Errors surfaced by configuration loading and the runtime.
#[derive(Debug, Error)]
pub enum AppError {
    /// Widget configuration did not parse.
    #[error("invalid widget configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The driver failed in a way the runtime cannot continue from.
    #[error("driver error")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}
