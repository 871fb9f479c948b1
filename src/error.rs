//! Crate-level error types.
//!
//! [`FolioError`] unifies every error source (configuration, HTTP,
//! WebSocket, JSON, local storage) behind a single enum so callers can
//! match on the variant they care about while still using the `?`
//! operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    /// A configuration value was missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An HTTP request to one of the remote services failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A remote service answered with a non-success status.
    #[error("api error: {0}")]
    Api(String),

    /// A terminal or filesystem operation failed.
    #[error("io error: {0}")]
    Io(String),
}
