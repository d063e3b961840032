//! Per-wave absence of a concept in an assembled dataset.

use abs_model::Wave;
use serde::Serialize;

use crate::assemble::AssembledDataset;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveMissingness {
    pub wave: Wave,
    pub rows: usize,
    pub absent: usize,
    /// `absent / rows`, or `0.0` for a wave without rows.
    pub absent_share: f64,
}

/// Counts absent values of `concept` within each wave's block of rows.
pub fn missingness(assembled: &AssembledDataset, concept: &str) -> Result<Vec<WaveMissingness>> {
    let column = assembled
        .data
        .column(concept)
        .map_err(|_| CoreError::MissingColumn {
            column: concept.to_string(),
        })?;

    let mut out = Vec::new();
    for wave in assembled.waves() {
        let Some((offset, rows)) = assembled.wave_range(wave) else {
            continue;
        };
        let absent = column.slice(offset as i64, rows).null_count();
        let absent_share = if rows == 0 {
            0.0
        } else {
            absent as f64 / rows as f64
        };
        out.push(WaveMissingness {
            wave,
            rows,
            absent,
            absent_share,
        });
    }
    Ok(out)
}
