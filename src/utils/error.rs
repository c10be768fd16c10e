//! Error types for `medlink`.
//!
//! Chat-side failures are collected in [`ChatError`]. Most of them never reach
//! a caller: the connection manager swallows transport errors and turns them
//! into a `Closed` transition, and malformed frames are logged and dropped.
//! REST failures are [`ApiError`] and are returned to the caller, which is
//! expected to show [`ApiError::user_message`] inline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("invalid frame: {0}")]
    Frame(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// The string a view shows next to the form that triggered the request.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Network(_) => "Unable to reach the server".to_string(),
            ApiError::Decode(_) => "Unexpected response from the server".to_string(),
            ApiError::InvalidUrl(e) => format!("Invalid request: {e}"),
        }
    }
}
