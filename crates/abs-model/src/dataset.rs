//! One wave's table of labeled columns.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};

use crate::error::{ModelError, Result};
use crate::labels::{ColumnMeta, LabeledColumn};
use crate::lookup::CaseInsensitiveSet;
use crate::wave::Wave;

/// A survey administration: respondents as rows, questions as columns.
///
/// Column descriptions and value labels live beside the frame, keyed by the
/// column name as spelled in `data`.
#[derive(Debug, Clone)]
pub struct WaveDataset {
    pub wave: Wave,
    pub data: DataFrame,
    pub metadata: BTreeMap<String, ColumnMeta>,
}

impl WaveDataset {
    pub fn new(wave: Wave, data: DataFrame, metadata: BTreeMap<String, ColumnMeta>) -> Self {
        Self {
            wave,
            data,
            metadata,
        }
    }

    /// Builds a dataset from labeled columns, rejecting ragged or duplicate columns.
    pub fn from_columns(wave: Wave, columns: Vec<LabeledColumn>) -> Result<Self> {
        let expected = columns.first().map_or(0, LabeledColumn::len);
        let mut metadata = BTreeMap::new();
        let mut frame_columns: Vec<Column> = Vec::with_capacity(columns.len());
        for column in columns {
            let name = column.name().to_string();
            if column.len() != expected {
                return Err(ModelError::RowCountMismatch {
                    wave,
                    column: name,
                    expected,
                    actual: column.len(),
                });
            }
            if metadata.contains_key(&name) {
                return Err(ModelError::DuplicateColumn { wave, column: name });
            }
            metadata.insert(name, column.meta());
            frame_columns.push(column.data);
        }
        let data = DataFrame::new(frame_columns)?;
        Ok(Self {
            wave,
            data,
            metadata,
        })
    }

    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Resolves a variable name to the dataset's spelling, ignoring case.
    pub fn resolve_name(&self, name: &str) -> Option<String> {
        if self.data.column(name).is_ok() {
            return Some(name.to_string());
        }
        CaseInsensitiveSet::new(self.column_names())
            .get(name)
            .map(str::to_string)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.resolve_name(name).is_some()
    }

    /// Fetches a column with its side tables.
    pub fn column(&self, name: &str) -> Option<LabeledColumn> {
        let resolved = self.resolve_name(name)?;
        let data = self.data.column(&resolved).ok()?.clone();
        let meta = self.metadata.get(&resolved).cloned().unwrap_or_default();
        Some(LabeledColumn::with_meta(data, meta))
    }

    /// Adds a column, replacing any existing column of the same name.
    pub fn put_column(&mut self, column: LabeledColumn) -> Result<()> {
        let name = column.name().to_string();
        if self.data.width() > 0 && column.len() != self.row_count() {
            return Err(ModelError::RowCountMismatch {
                wave: self.wave,
                column: name,
                expected: self.row_count(),
                actual: column.len(),
            });
        }
        let meta = column.meta();
        self.data.with_column(column.data)?;
        self.metadata.insert(name, meta);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::ValueLabels;

    fn sample() -> WaveDataset {
        let q7 = LabeledColumn::new(Column::new("Q7".into(), [1i64, 2, 3]))
            .with_description("Trust in the president")
            .with_value_labels([(1, "None at all")].into_iter().collect::<ValueLabels>());
        let q8 = LabeledColumn::new(Column::new("q8".into(), [4i64, 3, 2]));
        WaveDataset::from_columns(Wave::W2, vec![q7, q8]).unwrap()
    }

    #[test]
    fn column_lookup_ignores_case() {
        let dataset = sample();
        let column = dataset.column("q7").unwrap();
        assert_eq!(column.name(), "Q7");
        assert_eq!(column.description.as_deref(), Some("Trust in the president"));
        assert!(dataset.column("q9").is_none());
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let a = LabeledColumn::new(Column::new("a".into(), [1i64, 2]));
        let b = LabeledColumn::new(Column::new("b".into(), [1i64]));
        let err = WaveDataset::from_columns(Wave::W3, vec![a, b]).unwrap_err();
        assert!(matches!(err, ModelError::RowCountMismatch { .. }));
    }

    #[test]
    fn put_column_keeps_metadata() {
        let mut dataset = sample();
        let derived = LabeledColumn::new(Column::new("q8_harm".into(), [1i64, 2, 3]))
            .with_description("derived");
        dataset.put_column(derived).unwrap();
        assert_eq!(dataset.data.width(), 3);
        assert_eq!(
            dataset.metadata["q8_harm"].description.as_deref(),
            Some("derived")
        );

        let short = LabeledColumn::new(Column::new("bad".into(), [1i64]));
        assert!(dataset.put_column(short).is_err());
    }
}
