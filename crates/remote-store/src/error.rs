//! Error types for the remote store client.

use shoplist_core::sync::RemoteFailure;
use thiserror::Error;

/// Result type alias for remote store operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the shopping-list service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: no usable response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status, `success: false`, or a
    /// payload that could not be read.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status if the service answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for RemoteFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Api { status, message } => RemoteFailure::unsuccessful(status, message),
            ApiError::Http(err) => RemoteFailure::unreachable(err.to_string()),
            ApiError::Config(message) => RemoteFailure::unreachable(message),
        }
    }
}
