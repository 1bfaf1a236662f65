//! Item domain: models, validation and store contracts.

mod items_model;
mod items_traits;
mod items_validation;

pub use items_model::*;
pub use items_traits::*;
pub use items_validation::*;
