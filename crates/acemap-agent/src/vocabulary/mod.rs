//! Controlled vocabulary used for grounding.
//!
//! The vocabulary is the deduplicated union of the `subject` and `object`
//! columns of a knowledge-graph edge list. It is loaded once at startup and
//! never mutated, so a single instance can be shared behind an `Arc` by any
//! number of concurrent groundings.

mod csv_source;
mod parquet_source;

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{VocabularyError, VocabularyResult};

/// Edge-endpoint columns read from the dataset.
pub const COLUMNS: [&str; 2] = ["subject", "object"];

/// Immutable set of canonical terms, kept in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyStore {
    terms: Vec<String>,
}

impl VocabularyStore {
    /// Load the vocabulary, degrading to an empty store on any failure.
    ///
    /// An empty store turns grounding into the identity function, so the
    /// agent keeps working without the dataset.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading knowledge graph vocabulary");

        match Self::try_load(path) {
            Ok(store) => {
                tracing::info!(size = store.len(), "Knowledge graph loaded");
                store
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load knowledge graph, running without grounding"
                );
                Self::default()
            }
        }
    }

    /// Load the vocabulary, reporting read and schema errors.
    ///
    /// The format is chosen by extension: `.parquet` or `.csv`.
    pub fn try_load(path: impl AsRef<Path>) -> VocabularyResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let values = match extension.as_deref() {
            Some("parquet") => parquet_source::read_columns(path, &COLUMNS)?,
            Some("csv") => csv_source::read_columns(path, &COLUMNS)?,
            _ => return Err(VocabularyError::UnsupportedFormat(path.to_path_buf())),
        };

        Ok(Self::from_terms(values))
    }

    /// Build a store from arbitrary terms. Blank terms are dropped.
    #[must_use]
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: BTreeSet<String> = terms
            .into_iter()
            .map(Into::into)
            .filter(|t| !t.trim().is_empty())
            .collect();
        Self { terms: terms.into_iter().collect() }
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no dataset was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Exact membership test.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).is_ok()
    }

    /// Terms in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for VocabularyStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_terms(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_terms_dedups_and_sorts() {
        let store = VocabularyStore::from_terms(["Granite", "Basalt", "Granite", " ", ""]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.iter().collect::<Vec<_>>(), vec!["Basalt", "Granite"]);
    }

    #[test]
    fn test_contains() {
        let store: VocabularyStore = ["Plate tectonics", "Basalt"].into_iter().collect();
        assert!(store.contains("Basalt"));
        assert!(!store.contains("basalt"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = VocabularyStore::try_load("data/kg.xlsx").unwrap_err();
        assert!(matches!(err, VocabularyError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let store = VocabularyStore::load("does/not/exist.parquet");
        assert!(store.is_empty());
    }
}
