//! CSV reading for wave response files.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Rows used to infer column types; survey exports are wide and regular.
const SCHEMA_INFER_ROWS: usize = 1000;

/// Reads a wave CSV into a DataFrame.
///
/// The first row holds the variable names. Empty cells load as nulls.
pub fn read_wave_csv(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(SCHEMA_INFER_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_dataframe_shape(&df, path)?;
    Ok(df)
}

/// Rejects blank column names and warns about very wide files.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.width() > 2000 {
        tracing::warn!(
            path = %path.display(),
            columns = df.width(),
            "wave file has more than 2000 columns"
        );
    }
    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}
