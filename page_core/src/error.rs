// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;

/// Page enhancement error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("Invalid JSON response: {0}")]
    Decode(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Decode(err.to_string())
    }
}
