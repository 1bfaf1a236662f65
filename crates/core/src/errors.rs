//! Error types shared across the shopping-list core.

use thiserror::Error;

use crate::items::{ItemId, ValidationError};
use crate::sync::RemoteFailure;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the repository and presenter.
///
/// None of these is fatal: validation failures are reported before any network
/// traffic, remote failures are always followed by a refresh, and storage
/// failures only affect the on-device cache.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad user input, caught before any network call.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The remote store rejected the request or could not be reached.
    #[error(transparent)]
    Remote(#[from] RemoteFailure),

    /// A gesture referenced an id the current snapshot does not contain.
    #[error("Item {0} is not part of the current snapshot")]
    ItemNotFound(ItemId),

    /// The local cache could not be read or written.
    #[error("Local store error: {0}")]
    Storage(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Returns true when the error was raised before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::ItemNotFound(_))
    }
}
