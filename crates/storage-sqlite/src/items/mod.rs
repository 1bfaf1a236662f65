mod model;
mod repository;

pub use model::ShoppingItemDB;
pub use repository::SqliteItemStore;
