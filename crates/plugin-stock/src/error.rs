//! Error types for quote lookups

use thiserror::Error;

/// Quote plugin errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Provider answered with a non-success status
    #[error("API error: {0}")]
    ApiError(String),

    /// Symbol argument could not be used
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Socket error from the health endpoint
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Hub connection error
    #[error("Hub error: {0}")]
    Hub(#[from] plugin_core::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for quote operations
pub type Result<T> = std::result::Result<T, StockError>;

impl StockError {
    /// Whether the error means the hub subscription is gone
    pub fn is_stream_closed(&self) -> bool {
        matches!(self, StockError::Hub(plugin_core::Error::StreamClosed))
    }
}
