//! SQLite-backed on-device cache for the shopping list.

pub mod db;
pub mod errors;
pub mod items;
pub mod schema;

pub use db::{create_pool, get_connection, init, open, run_migrations, DbPool};
pub use errors::StorageError;
pub use items::SqliteItemStore;
