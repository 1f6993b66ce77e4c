//! Error types for hub communication

use thiserror::Error;

/// Result type alias for plugin-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for hub operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid hub configuration (URL, token)
    #[error("Configuration error: {0}")]
    Config(String),

    /// WebSocket transport failure
    #[error("Connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    /// Frame encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The hub closed the event stream
    #[error("event stream closed")]
    StreamClosed,

    /// The event stream of this connection was already taken
    #[error("event stream already started")]
    AlreadyStreaming,

    /// A message could not be handed to the hub
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    /// A hub call did not complete in time
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}
