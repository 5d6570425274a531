//! Coarse structured intent extracted from a free-text query.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Unvalidated structured guess produced by the completion service.
///
/// Deserialization never fails on type-unstable fields: a bare `keywords`
/// string becomes a one-element list, non-string names read as absent and
/// years accept numeric strings. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIntent {
    /// Extracted search terms, in the order the model produced them.
    #[serde(default, deserialize_with = "lenient::keywords")]
    pub keywords: Vec<String>,

    /// Institution, expanded to its official name by the model.
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: Option<String>,

    /// Author name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: Option<String>,

    /// Earliest publication year requested.
    #[serde(default, deserialize_with = "lenient::year")]
    pub year_start: Option<i32>,

    /// Latest publication year requested.
    #[serde(default, deserialize_with = "lenient::year")]
    pub year_end: Option<i32>,
}

impl RawIntent {
    /// Intent used when extraction fails: the whole query is the only keyword.
    #[must_use]
    pub fn fallback(query: &str) -> Self {
        Self { keywords: vec![query.to_string()], ..Self::default() }
    }

    /// Parse a completion payload, returning `None` if it is not a JSON object.
    #[must_use]
    pub fn from_json(text: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(text).ok()?;
        // Structs also deserialize from sequences; only objects are intents.
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}
