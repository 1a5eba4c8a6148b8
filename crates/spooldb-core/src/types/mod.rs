//! Shared value types and helpers.

pub mod json;
pub mod slug;

pub use json::to_pretty_json;
pub use slug::strip_illegal_chars;
