//! Core of the shopping-list client: the item model, the snapshot reconciler
//! and the list presenter.
//!
//! Transport and persistence live in sibling crates and plug in through
//! [`items::RemoteItemStore`] and [`items::LocalItemStore`].

pub mod errors;
pub mod items;
pub mod presenter;
pub mod sync;
pub mod utils;

pub use errors::{Error, Result};

#[cfg(test)]
mod test_support;
