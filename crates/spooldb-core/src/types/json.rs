//! The on-disk JSON formatting contract.
//!
//! Every record is UTF-8, pretty-printed with 2-space indentation and no
//! trailing newline, so that diffs of the data tree stay minimal.

use serde::Serialize;

use crate::result::AppResult;

/// Serialize a value in the canonical on-disk format.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> AppResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(value)?)
}
