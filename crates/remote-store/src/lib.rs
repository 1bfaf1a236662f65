//! REST client for the shopping-list product service.
//!
//! Implements [`shoplist_core::items::RemoteItemStore`] over
//! `GET/POST /api/products` and `PUT/DELETE /api/products/{id}`.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::ShoppingApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use types::{Envelope, ProductDto, ProductPayload, ResponseShape};
