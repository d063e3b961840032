use std::path::PathBuf;

use abs_model::{DiagnosticReport, Wave};
use abs_cli::output::OutputPaths;

#[derive(Debug)]
pub struct HarmonizeResult {
    pub data_dir: PathBuf,
    /// None for a dry run.
    pub outputs: Option<OutputPaths>,
    pub fingerprint: String,
    pub waves: Vec<WaveSummary>,
    pub total_rows: usize,
    pub total_columns: usize,
    pub report: DiagnosticReport,
}

#[derive(Debug)]
pub struct WaveSummary {
    pub wave: Wave,
    pub rows: usize,
    pub columns: usize,
    pub harmonized: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// One wave's line of the `concept` subcommand.
#[derive(Debug)]
pub struct ConceptWaveRow {
    pub wave: Wave,
    pub variable: Option<String>,
    pub status: String,
    pub rows: usize,
    pub absent: usize,
}

#[derive(Debug)]
pub struct ConceptResult {
    pub concept: String,
    pub description: String,
    pub rows: Vec<ConceptWaveRow>,
    pub report: DiagnosticReport,
}
