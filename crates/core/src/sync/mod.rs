//! Snapshot reconciliation against the remote store.

mod events;
mod item_repository;
mod remote_failure;
mod snapshot;

pub use events::*;
pub use item_repository::*;
pub use remote_failure::*;
pub use snapshot::*;

#[cfg(test)]
mod tests;
