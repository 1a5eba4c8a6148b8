//! Filesystem-safe directory keys.
//!
//! Every entity directory is named by the slug of its identity field. The
//! slug is applied before any directory is created or looked up, so callers
//! may pass either a display name or an existing key.

/// Characters that are never allowed in a directory name on any platform.
const ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Derive a filesystem-safe directory name from a display string.
///
/// Whitespace becomes `_`, characters illegal in paths and control
/// characters are dropped, and leading/trailing dots are trimmed so the
/// result can never be `.`, `..`, or a hidden directory. The function is
/// idempotent.
pub fn strip_illegal_chars(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_control() || ILLEGAL.contains(&c) {
                None
            } else {
                Some(c)
            }
        })
        .collect();

    cleaned.trim_matches('.').to_string()
}
