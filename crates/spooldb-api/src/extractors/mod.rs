//! Custom Axum extractors.

pub mod form;
pub mod json;
pub mod path;
pub mod writable;

pub use form::EntityForm;
pub use json::ValidatedJson;
pub use path::parse_index;
pub use writable::Writable;
