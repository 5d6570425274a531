//! CSV edge-list reader.

use std::path::Path;

use crate::error::{VocabularyError, VocabularyResult};

/// Read the non-empty cells of `columns`, in row order. Requires a header row.
pub(super) fn read_columns(path: &Path, columns: &[&str]) -> VocabularyResult<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let indices = columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h.trim() == *column)
                .ok_or_else(|| VocabularyError::missing_column(*column, path))
        })
        .collect::<VocabularyResult<Vec<_>>>()?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        for &idx in &indices {
            match record.get(idx) {
                Some(cell) if !cell.is_empty() => values.push(cell.to_string()),
                _ => {}
            }
        }
    }

    tracing::debug!(path = %path.display(), cells = values.len(), "Read CSV vocabulary");
    Ok(values)
}
