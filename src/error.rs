//! Error types for Pizzaiolo.

use thiserror::Error;

/// Library-level error type for Pizzaiolo operations.
#[derive(Error, Debug)]
pub enum PizzaioloError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote service error during '{operation}': {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid tool arguments: {0}")]
    InvalidToolArgs(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PizzaioloError {
    /// Wrap a remote-call failure with the name of the failed operation.
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        PizzaioloError::Remote {
            operation,
            message: message.into(),
        }
    }
}

/// Result type alias for Pizzaiolo operations.
pub type Result<T> = std::result::Result<T, PizzaioloError>;
