//! Concept-level access to wave datasets.
//!
//! Callers ask for a concept, not a question number. The accessor resolves
//! the concept through the registry, checks that the wave's data actually
//! carries the variable, and hands back the column. Absence is a value
//! ([`ConceptFetch::Absent`]) carrying a diagnostic; only a concept the
//! registry has never heard of is an error.

use std::collections::BTreeMap;
use std::fmt;

use abs_model::{
    Diagnostic, DiagnosticKind, DiagnosticReport, LabeledColumn, Wave, WaveDataset,
    harmonized_name,
};
use abs_registry::ConceptRegistry;
use abs_transform::{HarmonizeOptions, MissingPolicy, is_harmonized_column, resolve_missing};
use polars::prelude::{Column, DataFrame, DataType};
use tracing::{debug, warn};

use crate::assemble::{RESPONDENT_COLUMN, WAVE_COLUMN, assemble, check_wave_keys};
use crate::error::Result;

/// Outcome of fetching a concept from one wave.
#[derive(Debug, Clone)]
pub enum ConceptFetch {
    /// The column, named after the concept, with any diagnostic raised by
    /// label cleaning.
    Found {
        column: LabeledColumn,
        diagnostic: Option<Diagnostic>,
    },
    /// The wave has nothing for the concept.
    Absent(Diagnostic),
}

impl ConceptFetch {
    pub fn is_found(&self) -> bool {
        matches!(self, ConceptFetch::Found { .. })
    }

    pub fn column(&self) -> Option<&LabeledColumn> {
        match self {
            ConceptFetch::Found { column, .. } => Some(column),
            ConceptFetch::Absent(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ConceptFetch::Found { diagnostic, .. } => diagnostic.as_ref(),
            ConceptFetch::Absent(diagnostic) => Some(diagnostic),
        }
    }
}

/// Whether a concept can be read from a wave, and if not, which check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptStatus {
    Available { variable: String },
    NotMapped { concept: String, wave: Wave },
    VariableMissing {
        concept: String,
        wave: Wave,
        variable: String,
    },
}

impl ConceptStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ConceptStatus::Available { .. })
    }
}

impl fmt::Display for ConceptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConceptStatus::Available { variable } => write!(f, "available as {variable}"),
            ConceptStatus::NotMapped { concept, wave } => {
                write!(f, "{concept} has no variable mapped in {wave}")
            }
            ConceptStatus::VariableMissing {
                concept,
                wave,
                variable,
            } => write!(f, "{concept} maps to {variable} in {wave}, but the data has no such column"),
        }
    }
}

/// A concept stacked across waves: `wave`, `respondent_row`, and the concept column.
#[derive(Debug, Clone)]
pub struct ConceptSeries {
    pub data: DataFrame,
    pub report: DiagnosticReport,
}

impl ConceptSeries {
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }
}

/// Reads concepts out of wave datasets through a registry.
#[derive(Debug, Clone)]
pub struct ConceptAccessor<'a> {
    registry: &'a ConceptRegistry,
    label_policy: MissingPolicy,
}

impl<'a> ConceptAccessor<'a> {
    pub fn new(registry: &'a ConceptRegistry) -> Self {
        Self::with_options(registry, &HarmonizeOptions::default())
    }

    /// Uses the run's label catalog for `clean` requests.
    pub fn with_options(registry: &'a ConceptRegistry, options: &HarmonizeOptions) -> Self {
        Self {
            registry,
            label_policy: options.label_policy(),
        }
    }

    pub fn registry(&self) -> &ConceptRegistry {
        self.registry
    }

    /// Checks mapping and presence without touching the values.
    pub fn validate_concept(&self, dataset: &WaveDataset, concept: &str) -> Result<ConceptStatus> {
        let wave = dataset.wave;
        let Some(variable) = self.registry.variable_for(concept, wave)? else {
            return Ok(ConceptStatus::NotMapped {
                concept: concept.to_string(),
                wave,
            });
        };
        Ok(match dataset.resolve_name(variable) {
            Some(resolved) => ConceptStatus::Available { variable: resolved },
            None => ConceptStatus::VariableMissing {
                concept: concept.to_string(),
                wave,
                variable: variable.to_string(),
            },
        })
    }

    /// Fetches a concept's column from one wave.
    ///
    /// The column is always the variable the registry names for the wave:
    /// its `_harm` column when the dataset has been harmonized, the raw
    /// variable otherwise. A column that merely shares the concept's name is
    /// never read. With `clean`, label-based missing resolution is applied on
    /// top; values already absent stay absent, so cleaning twice is harmless.
    pub fn get_concept(
        &self,
        dataset: &WaveDataset,
        concept: &str,
        clean: bool,
    ) -> Result<ConceptFetch> {
        let wave = dataset.wave;
        let status = self.validate_concept(dataset, concept)?;
        let variable = match &status {
            ConceptStatus::Available { variable } => variable.clone(),
            ConceptStatus::NotMapped { .. } => {
                return Ok(ConceptFetch::Absent(
                    Diagnostic::new(DiagnosticKind::ConceptNotMapped, status.to_string())
                        .in_wave(wave)
                        .for_concept(concept),
                ));
            }
            ConceptStatus::VariableMissing { variable, .. } => {
                return Ok(ConceptFetch::Absent(
                    Diagnostic::new(DiagnosticKind::VariableMissing, status.to_string())
                        .in_wave(wave)
                        .for_concept(concept)
                        .for_variable(variable.as_str()),
                ));
            }
        };

        let Some(raw) = dataset.column(&variable) else {
            return Ok(ConceptFetch::Absent(
                Diagnostic::new(
                    DiagnosticKind::VariableMissing,
                    format!("{variable} for {concept} not in {wave} data"),
                )
                .in_wave(wave)
                .for_concept(concept)
                .for_variable(&variable),
            ));
        };
        // Harmonized values when the harmonizer wrote them; the description
        // stays the raw variable's either way.
        let harmonized = dataset
            .column(&harmonized_name(&variable))
            .filter(is_harmonized_column);
        let source = match harmonized {
            Some(harmonized) => LabeledColumn {
                data: harmonized.data,
                description: raw.description,
                value_labels: harmonized.value_labels,
            },
            None => raw,
        };
        debug!(concept, wave = %wave, column = source.name(), "concept resolved");

        let column = source.renamed(concept);
        if !clean {
            return Ok(ConceptFetch::Found {
                column,
                diagnostic: None,
            });
        }
        let resolved = resolve_missing(&column, &self.label_policy)?;
        Ok(ConceptFetch::Found {
            column: resolved.column,
            diagnostic: resolved
                .diagnostic
                .map(|d| d.in_wave(wave).for_concept(concept)),
        })
    }

    /// Fetches a concept from every wave and stacks the waves that have it.
    ///
    /// Waves where the concept is unmapped or missing contribute no rows,
    /// only a diagnostic. When no wave has data the result is an empty table
    /// with a [`DiagnosticKind::NoWaveData`] diagnostic.
    pub fn get_concept_all_waves(
        &self,
        concept: &str,
        waves: &BTreeMap<Wave, WaveDataset>,
        clean: bool,
    ) -> Result<ConceptSeries> {
        check_wave_keys(waves)?;
        let mut report = DiagnosticReport::new();
        let mut found = BTreeMap::new();
        for (wave, dataset) in waves {
            match self.get_concept(dataset, concept, clean)? {
                ConceptFetch::Found { column, diagnostic } => {
                    if let Some(diagnostic) = diagnostic {
                        report.push(diagnostic);
                    }
                    found.insert(*wave, WaveDataset::from_columns(*wave, vec![column])?);
                }
                ConceptFetch::Absent(diagnostic) => report.push(diagnostic),
            }
        }

        if found.is_empty() {
            let diagnostic = Diagnostic::new(
                DiagnosticKind::NoWaveData,
                format!("no wave has data for {concept}"),
            )
            .for_concept(concept);
            warn!(concept, "{}", diagnostic.message);
            report.push(diagnostic);
            let data = DataFrame::new(vec![
                Column::new(WAVE_COLUMN.into(), Vec::<&str>::new()),
                Column::new(RESPONDENT_COLUMN.into(), Vec::<i64>::new()),
                Column::full_null(concept.into(), 0, &DataType::Int64),
            ])?;
            return Ok(ConceptSeries { data, report });
        }

        let assembled = assemble(&found)?;
        report.extend(assembled.report);
        Ok(ConceptSeries {
            data: assembled.dataset.data,
            report,
        })
    }
}
