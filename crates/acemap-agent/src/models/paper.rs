//! Paper records returned by the Acemap work search API.

use serde::{Deserialize, Serialize};

use super::lenient;

/// A work record from Acemap. Read-only to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Display title (preferred over `title`).
    #[serde(default, deserialize_with = "lenient::string")]
    pub display_name: Option<String>,

    /// Title.
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,

    /// Publication year; numeric strings are accepted and fractions truncate.
    #[serde(default, deserialize_with = "lenient::year")]
    pub publication_year: Option<i32>,

    /// Citation count.
    #[serde(default, deserialize_with = "lenient::count")]
    pub cited_by_count: Option<i64>,

    /// Remaining fields, preserved untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaperRecord {
    /// Title for display: `display_name`, then `title`, then "No Title".
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.title.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("No Title")
    }

    /// Citation count or 0 if not available.
    #[must_use]
    pub fn citations(&self) -> i64 {
        self.cited_by_count.unwrap_or(0)
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Total matches reported by the service.
    pub total: u64,
    /// Records in ranked order.
    pub records: Vec<PaperRecord>,
}

impl SearchPage {
    /// An empty page, used for every failure.
    #[must_use]
    pub const fn empty() -> Self {
        Self { total: 0, records: Vec::new() }
    }
}

#[derive(Deserialize)]
struct Meta {
    #[serde(default)]
    count: Option<u64>,
}

/// Raw response body: `{"results": [...], "meta": {"count": N}}`.
#[derive(Deserialize)]
pub(crate) struct AcemapResponse {
    #[serde(default)]
    results: Option<Vec<PaperRecord>>,
    #[serde(default)]
    meta: Option<Meta>,
}

impl From<AcemapResponse> for SearchPage {
    fn from(response: AcemapResponse) -> Self {
        let Some(records) = response.results else {
            return Self::empty();
        };
        let total = response
            .meta
            .and_then(|m| m.count)
            .unwrap_or(records.len() as u64);
        Self { total, records }
    }
}
