//! Cross-wave assembly.
//!
//! Harmonized waves are stacked row-wise (never joined) in canonical wave
//! order. Every row is tagged with its wave and its row index within that
//! wave; columns a wave lacks are padded with absent values for its rows.

use std::collections::BTreeMap;

use abs_model::{
    ColumnMeta, Diagnostic, DiagnosticKind, DiagnosticReport, LabeledColumn, Wave, WaveDataset,
};
use polars::prelude::{Column, DataFrame, DataType};
use tracing::{info, info_span, warn};

use crate::error::AssembleError;

/// Column holding the wave identifier of each row.
pub const WAVE_COLUMN: &str = "wave";
/// Column holding the zero-based row index within the source wave.
pub const RESPONDENT_COLUMN: &str = "respondent_row";

/// All waves of a study as one long table.
#[derive(Debug, Clone)]
pub struct AssembledDataset {
    pub data: DataFrame,
    /// Column side tables, taken from the first wave that carries them.
    pub metadata: BTreeMap<String, ColumnMeta>,
    row_counts: BTreeMap<Wave, usize>,
}

impl AssembledDataset {
    pub fn height(&self) -> usize {
        self.data.height()
    }

    /// Rows contributed by each wave.
    pub fn row_counts(&self) -> &BTreeMap<Wave, usize> {
        &self.row_counts
    }

    /// Waves present, in canonical order.
    pub fn waves(&self) -> impl Iterator<Item = Wave> + '_ {
        self.row_counts.keys().copied()
    }

    /// Offset and length of a wave's block of rows.
    pub fn wave_range(&self, wave: Wave) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (candidate, rows) in &self.row_counts {
            if *candidate == wave {
                return Some((offset, *rows));
            }
            offset += rows;
        }
        None
    }

    /// The rows of one wave.
    pub fn wave_rows(&self, wave: Wave) -> Option<DataFrame> {
        let (offset, len) = self.wave_range(wave)?;
        Some(self.data.slice(offset as i64, len))
    }

    pub fn column(&self, name: &str) -> Option<LabeledColumn> {
        let data = self.data.column(name).ok()?.clone();
        let meta = self.metadata.get(name).cloned().unwrap_or_default();
        Some(LabeledColumn::with_meta(data, meta))
    }
}

/// An assembled dataset and the diagnostics raised while stacking.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub dataset: AssembledDataset,
    pub report: DiagnosticReport,
}

/// Stacks wave datasets into one table.
///
/// The row count is exactly the sum of the per-wave row counts. Columns
/// whose type differs between waves are unified: integer with integer stays
/// `Int64`, integer with float becomes `Float64`, anything else becomes text
/// with a [`DiagnosticKind::SchemaMismatch`] diagnostic. A map key that
/// differs from its dataset's wave is an error.
pub fn assemble(waves: &BTreeMap<Wave, WaveDataset>) -> Result<Assembled, AssembleError> {
    let span = info_span!("assemble", waves = waves.len());
    let _guard = span.enter();

    check_wave_keys(waves)?;

    let mut order: Vec<String> = Vec::new();
    let mut dtypes: BTreeMap<String, Vec<DataType>> = BTreeMap::new();
    for dataset in waves.values() {
        for column in dataset.data.get_columns() {
            let name = column.name().to_string();
            if is_reserved(&name) {
                return Err(AssembleError::ReservedColumn {
                    wave: dataset.wave,
                    column: name,
                });
            }
            if !dtypes.contains_key(&name) {
                order.push(name.clone());
            }
            dtypes.entry(name).or_default().push(column.dtype().clone());
        }
    }

    let mut report = DiagnosticReport::new();
    let mut targets: BTreeMap<&str, DataType> = BTreeMap::new();
    for name in &order {
        let seen = dtypes.get(name).map(Vec::as_slice).unwrap_or(&[]);
        let (dtype, mismatch) = unify(seen);
        if mismatch {
            let diagnostic = Diagnostic::new(
                DiagnosticKind::SchemaMismatch,
                format!("{name} has different types across waves; stored as text"),
            )
            .for_variable(name);
            warn!(column = %name, "{}", diagnostic.message);
            report.push(diagnostic);
        }
        targets.insert(name.as_str(), dtype);
    }

    let mut stacked: Option<DataFrame> = None;
    let mut row_counts = BTreeMap::new();
    for (wave, dataset) in waves {
        let frame = wave_frame(*wave, dataset, &order, &targets)?;
        row_counts.insert(*wave, frame.height());
        match stacked.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&frame)?;
            }
            None => stacked = Some(frame),
        }
    }
    let data = match stacked {
        Some(data) => data,
        None => DataFrame::new(vec![
            Column::new(WAVE_COLUMN.into(), Vec::<&str>::new()),
            Column::new(RESPONDENT_COLUMN.into(), Vec::<i64>::new()),
        ])?,
    };

    let metadata = merge_metadata(waves, &order);
    info!(rows = data.height(), columns = data.width(), "waves assembled");
    Ok(Assembled {
        dataset: AssembledDataset {
            data,
            metadata,
            row_counts,
        },
        report,
    })
}

/// Every map key must be the wave its dataset declares; rows are tagged
/// with the key.
pub(crate) fn check_wave_keys(waves: &BTreeMap<Wave, WaveDataset>) -> Result<(), AssembleError> {
    for (key, dataset) in waves {
        if *key != dataset.wave {
            return Err(AssembleError::WaveMismatch {
                key: *key,
                dataset: dataset.wave,
            });
        }
    }
    Ok(())
}

fn is_reserved(name: &str) -> bool {
    name.eq_ignore_ascii_case(WAVE_COLUMN) || name.eq_ignore_ascii_case(RESPONDENT_COLUMN)
}

fn unify(dtypes: &[DataType]) -> (DataType, bool) {
    let present: Vec<&DataType> = dtypes.iter().filter(|d| **d != DataType::Null).collect();
    let Some(first) = present.first() else {
        return (DataType::Null, false);
    };
    if present.iter().all(|d| d == first) {
        return ((*first).clone(), false);
    }
    if present.iter().all(|d| d.is_integer()) {
        return (DataType::Int64, false);
    }
    if present.iter().all(|d| d.is_integer() || d.is_float()) {
        return (DataType::Float64, false);
    }
    (DataType::String, true)
}

fn wave_frame(
    wave: Wave,
    dataset: &WaveDataset,
    order: &[String],
    targets: &BTreeMap<&str, DataType>,
) -> Result<DataFrame, AssembleError> {
    let rows = dataset.row_count();
    let mut columns = Vec::with_capacity(order.len() + 2);
    columns.push(Column::new(WAVE_COLUMN.into(), vec![wave.as_str(); rows]));
    columns.push(Column::new(
        RESPONDENT_COLUMN.into(),
        (0..rows as i64).collect::<Vec<i64>>(),
    ));
    for name in order {
        let dtype = targets.get(name.as_str()).unwrap_or(&DataType::Null);
        let column = match dataset.data.column(name) {
            Ok(column) if column.dtype() == dtype => column.clone(),
            Ok(column) => column.cast(dtype)?,
            Err(_) => Column::full_null(name.as_str().into(), rows, dtype),
        };
        columns.push(column);
    }
    Ok(DataFrame::new(columns)?)
}

fn merge_metadata(
    waves: &BTreeMap<Wave, WaveDataset>,
    order: &[String],
) -> BTreeMap<String, ColumnMeta> {
    let mut merged = BTreeMap::new();
    for name in order {
        let mut meta = ColumnMeta::default();
        for dataset in waves.values() {
            let Some(source) = dataset.metadata.get(name) else {
                continue;
            };
            if meta.description.is_none() {
                meta.description.clone_from(&source.description);
            }
            if meta.value_labels.as_ref().is_none_or(|l| l.is_empty()) {
                meta.value_labels.clone_from(&source.value_labels);
            }
        }
        merged.insert(name.clone(), meta);
    }
    merged
}
