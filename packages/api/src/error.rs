//! Errors surfaced by the call wrapper.

use thiserror::Error;

/// Text shown to the user when a failure carries no server message.
pub const FALLBACK_MESSAGE: &str = "Error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Status { status: u16, message: Option<String> },

    /// The response body did not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request body could not be serialised.
    #[error("invalid request body: {0}")]
    Body(String),

    #[error("unsupported HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("invalid API path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl ApiError {
    /// The message a user should see for this failure.
    ///
    /// Only the server-provided message is ever shown verbatim; everything else
    /// collapses to [`FALLBACK_MESSAGE`].
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message,
            _ => FALLBACK_MESSAGE,
        }
    }

    /// HTTP status, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
