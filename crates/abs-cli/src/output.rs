//! Output writers for a harmonization run.
//!
//! A run directory holds the assembled long table, the codebook and a JSON
//! document with the diagnostics, per-wave row counts, options and the
//! registry fingerprint.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use abs_core::{StudyOutcome, codebook};
use abs_model::{Diagnostic, Wave};
use abs_registry::ConceptRegistry;
use abs_transform::HarmonizeOptions;
use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;
use tracing::{debug, info};

pub const ASSEMBLED_FILE: &str = "assembled.csv";
pub const CODEBOOK_FILE: &str = "codebook.csv";
pub const DIAGNOSTICS_FILE: &str = "diagnostics.json";

/// Files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub assembled: PathBuf,
    pub codebook: PathBuf,
    pub diagnostics: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            assembled: dir.join(ASSEMBLED_FILE),
            codebook: dir.join(CODEBOOK_FILE),
            diagnostics: dir.join(DIAGNOSTICS_FILE),
        }
    }
}

#[derive(Debug, Serialize)]
struct WaveRows {
    wave: Wave,
    rows: usize,
}

#[derive(Debug, Serialize)]
struct DiagnosticsDocument<'a> {
    fingerprint: &'a str,
    options: &'a HarmonizeOptions,
    total_rows: usize,
    waves: Vec<WaveRows>,
    warnings: usize,
    infos: usize,
    diagnostics: &'a [Diagnostic],
}

/// Writes every output file of a run into `dir`, creating it if needed.
pub fn write_outputs(
    dir: &Path,
    outcome: &StudyOutcome,
    registry: &ConceptRegistry,
    options: &HarmonizeOptions,
) -> Result<OutputPaths> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let paths = OutputPaths::in_dir(dir);

    write_csv(&paths.assembled, &outcome.assembled.data)?;
    let codebook = codebook(registry).context("build codebook")?;
    write_csv(&paths.codebook, &codebook)?;
    write_diagnostics(&paths.diagnostics, outcome, options)?;

    info!(dir = %dir.display(), "outputs written");
    Ok(paths)
}

/// Writes a table as CSV with a header row; absent values are empty cells.
pub fn write_csv(path: &Path, data: &DataFrame) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut data = data.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut data)
        .with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), rows = data.height(), "csv written");
    Ok(())
}

pub fn write_diagnostics(
    path: &Path,
    outcome: &StudyOutcome,
    options: &HarmonizeOptions,
) -> Result<()> {
    let document = DiagnosticsDocument {
        fingerprint: &outcome.fingerprint,
        options,
        total_rows: outcome.assembled.height(),
        waves: outcome
            .assembled
            .row_counts()
            .iter()
            .map(|(wave, rows)| WaveRows {
                wave: *wave,
                rows: *rows,
            })
            .collect(),
        warnings: outcome.report.warning_count(),
        infos: outcome.report.info_count(),
        diagnostics: &outcome.report.diagnostics,
    };
    let json = serde_json::to_string_pretty(&document).context("serialize diagnostics")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
