//! Parquet edge-list reader.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::Type;

use crate::error::{VocabularyError, VocabularyResult};

/// Read the non-null string cells of `columns`, in row order.
pub(super) fn read_columns(path: &Path, columns: &[&str]) -> VocabularyResult<Vec<String>> {
    let file = File::open(path).map_err(|e| VocabularyError::io(path, e))?;
    let reader = SerializedFileReader::new(file)?;

    let root = reader.metadata().file_metadata().schema_descr().root_schema();
    let mut projected = Vec::with_capacity(columns.len());
    for column in columns {
        let field = root
            .get_fields()
            .iter()
            .find(|f| f.name() == *column)
            .ok_or_else(|| VocabularyError::missing_column(*column, path))?;
        projected.push(Arc::clone(field));
    }
    let projection = Type::group_type_builder(root.name()).with_fields(projected).build()?;

    // Only the projected columns are decoded.
    let mut values = Vec::new();
    for row in reader.get_row_iter(Some(projection))? {
        for (_, field) in row?.get_column_iter() {
            if let Field::Str(value) = field {
                values.push(value.clone());
            }
        }
    }

    tracing::debug!(path = %path.display(), cells = values.len(), "Read parquet vocabulary");
    Ok(values)
}
