// src/error.rs

//! Unified error handling for the bot.

use thiserror::Error;

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tumblr could not be reached, timed out, or answered with a
    /// server error or malformed body
    #[error("tumblr unavailable: {0}")]
    RemoteUnavailable(String),

    /// Tumblr rejected a write
    #[error("tumblr rejected the request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No posts cached when a random pick was requested
    #[error("no bnotws cached yet")]
    EmptyCache,

    /// Search query below the minimum length
    #[error("search query must be at least {min} characters")]
    QueryTooShort { min: usize },

    /// Command input validation error
    #[error("{0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Slack API call failed
    #[error("Slack API error: {0}")]
    Slack(String),

    /// WebSocket connection error
    #[error("WebSocket error: {0}")]
    WebSocket(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a remote-unavailable error.
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable(message.into())
    }

    /// Create a remote-rejected error.
    pub fn remote_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status,
            message: message.into(),
        }
    }

    /// Create a Slack API error.
    pub fn slack(message: impl Into<String>) -> Self {
        Self::Slack(message.into())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::RemoteUnavailable(format!("request timed out: {err}"))
        } else if err.is_connect() {
            AppError::RemoteUnavailable(format!("connection failed: {err}"))
        } else {
            AppError::RemoteUnavailable(err.to_string())
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for AppError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        AppError::WebSocket(err.to_string())
    }
}
