//! Shapes shared by several catalog levels.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use spooldb_core::traits::is_logo_file;
use spooldb_core::types::strip_illegal_chars;
use spooldb_core::{AppError, AppResult};

/// A value that may arrive either bare or wrapped in a sequence.
///
/// Used for inputs such as sizes and shipping regions, where a single item is
/// often submitted without the surrounding array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A sequence of values.
    Many(Vec<T>),
    /// A single bare value.
    One(T),
}

impl<T> OneOrMany<T> {
    /// Normalize into a sequence; a bare value becomes a one-element vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    /// Iterate over the contained values without consuming them.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::Many(items) => items.iter(),
            Self::One(item) => std::slice::from_ref(item).iter(),
        }
    }

    /// Number of contained values.
    pub fn len(&self) -> usize {
        match self {
            Self::Many(items) => items.len(),
            Self::One(_) => 1,
        }
    }

    /// Whether no values are contained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items)
    }
}

/// Deserialize a field that may be a bare value or a sequence into a `Vec`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(OneOrMany::<T>::deserialize(deserializer)?.into_vec())
}

/// Deserialize an optional string, treating a blank value as absent.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(clean_text(value))
}

/// An uploaded logo image to be stored next to an entity's JSON file.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    /// File name as supplied by the client.
    pub file_name: String,
    /// Raw image bytes.
    pub bytes: Bytes,
}

impl LogoUpload {
    /// Create a new upload.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// The file name to store the logo under.
    ///
    /// Any client-side directory prefix is dropped and the remainder is
    /// slugged. The result must still carry a recognised image extension.
    pub fn stored_name(&self) -> AppResult<String> {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        let name = strip_illegal_chars(base);
        if name.is_empty() || !is_logo_file(&name) {
            return Err(AppError::validation(format!(
                "Logo file '{}' must be a png, jpg, jpeg, svg or webp image",
                self.file_name
            )));
        }
        Ok(name)
    }
}

/// Largest integer an IEEE double holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Write a number the way the catalog files spell it: integral values
/// without a fractional part (`1000`, not `1000.0`).
pub(crate) fn js_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// [`js_number`] for optional fields.
pub(crate) fn js_number_opt<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => js_number(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// Drop non-finite numbers.
pub(crate) fn clean_number(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Trim text and drop it when nothing is left.
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_value_becomes_single_element() {
        let parsed: OneOrMany<String> = serde_json::from_str("\"DE\"").unwrap();
        assert_eq!(parsed.into_vec(), vec!["DE".to_string()]);

        let parsed: OneOrMany<String> = serde_json::from_str("[\"DE\", \"AT\"]").unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_logo_name_is_sanitized() {
        let upload = LogoUpload::new("C:\\Users\\me\\acme logo.PNG", vec![1u8, 2, 3]);
        assert_eq!(upload.stored_name().unwrap(), "acme_logo.PNG");

        let upload = LogoUpload::new("../../etc/passwd", Vec::new());
        assert!(upload.stored_name().is_err());
    }

    #[test]
    fn test_integral_numbers_have_no_fraction() {
        #[derive(Serialize)]
        struct Sample {
            #[serde(serialize_with = "js_number")]
            weight: f64,
            #[serde(serialize_with = "js_number")]
            diameter: f64,
            #[serde(serialize_with = "js_number_opt")]
            temp: Option<f64>,
        }

        let text = serde_json::to_string(&Sample {
            weight: 1000.0,
            diameter: 1.75,
            temp: Some(-5.0),
        })
        .unwrap();
        assert_eq!(text, r#"{"weight":1000,"diameter":1.75,"temp":-5}"#);
    }

    #[test]
    fn test_clean_helpers() {
        assert_eq!(clean_number(Some(f64::NAN)), None);
        assert_eq!(clean_number(Some(215.0)), Some(215.0));
        assert_eq!(clean_text(Some("   ".into())), None);
        assert_eq!(clean_text(Some(" PLA ".into())), Some("PLA".into()));
    }
}
