//! Failure taxonomy for remote store calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Retry policy classification for remote failures.
///
/// Only used to phrase user-facing notices; nothing retries automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRetryClass {
    Retryable,
    Permanent,
}

/// Classify HTTP status into retry behavior.
pub fn classify_http_status(status: u16) -> SyncRetryClass {
    match status {
        408 | 409 | 423 | 425 | 429 => SyncRetryClass::Retryable,
        500..=599 => SyncRetryClass::Retryable,
        _ => SyncRetryClass::Permanent,
    }
}

/// Outcome of a remote call that did not produce the expected payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    /// The server answered, but with a non-2xx status, an envelope carrying
    /// `success: false`, or a payload that could not be read.
    #[error("server rejected the request ({status}): {body}")]
    Unsuccessful { status: u16, body: String },

    /// No response: timeout, DNS failure, refused or dropped connection.
    #[error("server unreachable: {0}")]
    Unreachable(String),
}

impl RemoteFailure {
    pub fn unsuccessful(status: u16, body: impl Into<String>) -> Self {
        Self::Unsuccessful {
            status,
            body: body.into(),
        }
    }

    pub fn unreachable(cause: impl Into<String>) -> Self {
        Self::Unreachable(cause.into())
    }

    /// HTTP status if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unsuccessful { status, .. } => Some(*status),
            Self::Unreachable(_) => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    pub fn retry_class(&self) -> SyncRetryClass {
        match self {
            Self::Unsuccessful { status, .. } => classify_http_status(*status),
            Self::Unreachable(_) => SyncRetryClass::Retryable,
        }
    }
}
