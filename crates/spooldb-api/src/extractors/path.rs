//! Typed path parameter helpers.

use spooldb_core::AppError;

/// Parses a size index from a path segment.
pub fn parse_index(s: &str) -> Result<usize, AppError> {
    s.parse::<usize>()
        .map_err(|_| AppError::validation(format!("Invalid size index: {s}")))
}
