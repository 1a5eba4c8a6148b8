//! Marker file names and directory key rules of the data tree.

use spooldb_core::types::strip_illegal_chars;
use spooldb_core::{AppError, AppResult};

/// Marks a directory under the data root as a brand.
pub const BRAND_FILE: &str = "brand.json";
/// Marks a directory under a brand as a material.
pub const MATERIAL_FILE: &str = "material.json";
/// Marks a directory under a material as a filament.
pub const FILAMENT_FILE: &str = "filament.json";
/// Descriptive half of a color's marker pair.
pub const VARIANT_FILE: &str = "variant.json";
/// Size half of a color's marker pair.
pub const SIZES_FILE: &str = "sizes.json";
/// Marks a directory under the store root as a store.
pub const STORE_FILE: &str = "store.json";

/// Directory key for an identity value.
///
/// Fails with `Validation` when nothing usable is left after slugging.
pub fn dir_key(what: &str, name: &str) -> AppResult<String> {
    let key = strip_illegal_chars(name);
    if key.is_empty() {
        return Err(AppError::validation(format!(
            "{what} name '{name}' has no characters usable in a directory name"
        )));
    }
    Ok(key)
}
