//! Structured errors for the parcep binary.

/// Errors raised by command handlers before or after a lookup.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid command-line arguments.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A result could not be rendered as JSON.
    #[error("OUTPUT_FAILED: {0}")]
    Output(#[from] serde_json::Error),
}
