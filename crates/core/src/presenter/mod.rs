//! List presentation: snapshot-to-row mapping, notices and gesture handling.

mod list_presenter;
mod surface;
mod view_model;

pub use list_presenter::*;
pub use surface::*;
pub use view_model::*;
