//! Per-wave harmonization.
//!
//! For each family with a scale entry for the dataset's wave, every family
//! variable present in the data is cleaned with the family's missing policy,
//! reversed when the wave's polarity is descending, and stored as
//! `<var>_harm`. Afterwards each registry concept gets a column named after
//! it: the harmonized variable when there is one, the raw variable
//! otherwise, or an all-absent column when the wave has neither.
//!
//! Original columns are never touched. Missing variables and unmapped waves
//! become diagnostics, not errors.

use std::collections::BTreeMap;

use abs_model::{
    Diagnostic, DiagnosticKind, DiagnosticReport, LabeledColumn, ScaleFamily, ScaleSpec, Severity,
    Wave, WaveDataset, harmonized_name,
};
use abs_registry::{ConceptRegistry, FamilyVariable};
use polars::prelude::{Column, DataType};
use tracing::{debug, info, info_span, warn};

use crate::codes::to_code_column;
use crate::error::Result;
use crate::missing::resolve_missing;
use crate::options::HarmonizeOptions;
use crate::reversal::reverse_column;

/// Opens the audit note appended to the description of every `_harm` column.
pub const HARMONIZED_MARKER: &str = "[harmonized: ";

/// True when `column` was written by [`harmonize`], judged by its audit note.
///
/// A raw column that merely happens to end in `_harm` carries no such note.
pub fn is_harmonized_column(column: &LabeledColumn) -> bool {
    column
        .description
        .as_deref()
        .is_some_and(|description| description.contains(HARMONIZED_MARKER))
}

/// A harmonized wave and the diagnostics raised while building it.
#[derive(Debug, Clone)]
pub struct Harmonized {
    pub dataset: WaveDataset,
    pub report: DiagnosticReport,
}

/// Harmonizes one wave against the registry.
///
/// The wave is the one the dataset declares; the scale of every variable is
/// looked up for that wave and family, never assumed.
pub fn harmonize(
    dataset: &WaveDataset,
    registry: &ConceptRegistry,
    options: &HarmonizeOptions,
) -> Result<Harmonized> {
    let wave = dataset.wave;
    let span = info_span!("harmonize", wave = %wave, rows = dataset.row_count());
    let _guard = span.enter();

    let mut state = WaveState {
        wave,
        source: dataset,
        output: dataset.clone(),
        report: DiagnosticReport::new(),
        harmonized: BTreeMap::new(),
    };

    for family in registry.families() {
        state.harmonize_family(registry, family, options)?;
    }
    state.add_concept_columns(registry)?;

    info!(
        harmonized = state.harmonized.len(),
        warnings = state.report.warning_count(),
        "wave harmonized"
    );
    Ok(Harmonized {
        dataset: state.output,
        report: state.report,
    })
}

struct WaveState<'a> {
    wave: Wave,
    source: &'a WaveDataset,
    output: WaveDataset,
    report: DiagnosticReport,
    /// Uppercased raw variable name to its `_harm` column.
    harmonized: BTreeMap<String, String>,
}

impl WaveState<'_> {
    fn record(&mut self, diagnostic: Diagnostic) {
        let diagnostic = diagnostic.in_wave(self.wave);
        match diagnostic.severity {
            Severity::Warning => warn!(kind = %diagnostic.kind, "{}", diagnostic.message),
            Severity::Info => debug!(kind = %diagnostic.kind, "{}", diagnostic.message),
        }
        self.report.push(diagnostic);
    }

    fn harmonize_family(
        &mut self,
        registry: &ConceptRegistry,
        family: &ScaleFamily,
        options: &HarmonizeOptions,
    ) -> Result<()> {
        let Some(spec) = family.spec_for(self.wave) else {
            self.record(Diagnostic::new(
                DiagnosticKind::FamilyNotConfigured,
                format!("family '{}' has no scale for {}", family.name, self.wave),
            ));
            return Ok(());
        };
        debug!(family = %family.name, scale = %spec, "harmonizing family");

        let policy = options.policy_for(family);
        for member in registry.family_variables(&family.name, self.wave) {
            let Some(raw) = self.source.column(&member.variable) else {
                // Concept-backed variables are reported once, with the concept.
                if member.concept.is_none() {
                    self.record(
                        Diagnostic::new(
                            DiagnosticKind::VariableMissing,
                            format!(
                                "{} of family '{}' not in data",
                                member.variable, family.name
                            ),
                        )
                        .for_variable(&member.variable),
                    );
                }
                continue;
            };
            let Some(codes) = to_code_column(&raw)? else {
                self.record(
                    Diagnostic::new(
                        DiagnosticKind::NonNumericScale,
                        format!("{} holds values that are not response codes", raw.name()),
                    )
                    .for_variable(raw.name()),
                );
                continue;
            };

            let target = harmonized_name(raw.name());
            if self.source.has_column(&target) {
                self.record(
                    Diagnostic::new(
                        DiagnosticKind::ColumnCollision,
                        format!("{target} already exists in the raw data; not harmonized"),
                    )
                    .for_variable(raw.name()),
                );
                continue;
            }

            let resolved = resolve_missing(&codes, &policy)?;
            if let Some(diagnostic) = resolved.diagnostic {
                self.record(diagnostic);
            }
            let scaled = if spec.needs_reversal() {
                reverse_column(&resolved.column, spec.width)
            } else {
                resolved.column
            };

            let description = audit_description(raw.description.as_deref(), &member, spec);
            self.output
                .put_column(scaled.renamed(&target).with_description(description))?;
            debug!(variable = raw.name(), target = %target, "harmonized");
            self.harmonized
                .insert(raw.name().to_ascii_uppercase(), target);
        }
        Ok(())
    }

    fn add_concept_columns(&mut self, registry: &ConceptRegistry) -> Result<()> {
        for mapping in registry.concepts() {
            if self.source.has_column(&mapping.concept) {
                self.record(
                    Diagnostic::new(
                        DiagnosticKind::ColumnCollision,
                        format!(
                            "raw column '{}' shadows the concept of the same name",
                            mapping.concept
                        ),
                    )
                    .for_concept(&mapping.concept),
                );
                continue;
            }

            let column = match mapping.variable(self.wave) {
                None => {
                    self.record(
                        Diagnostic::new(
                            DiagnosticKind::ConceptNotMapped,
                            format!("{} is not asked in {}", mapping.concept, self.wave),
                        )
                        .for_concept(&mapping.concept),
                    );
                    None
                }
                Some(variable) => match self.source.column(variable) {
                    None => {
                        self.record(
                            Diagnostic::new(
                                DiagnosticKind::VariableMissing,
                                format!("{variable} for {} not in data", mapping.concept),
                            )
                            .for_concept(&mapping.concept)
                            .for_variable(variable),
                        );
                        None
                    }
                    Some(raw) => Some(self.concept_source(raw)),
                },
            };

            let column = column.unwrap_or_else(|| {
                LabeledColumn::new(Column::full_null(
                    mapping.concept.as_str().into(),
                    self.source.row_count(),
                    &DataType::Int64,
                ))
                .with_description(mapping.description.clone())
            });
            self.output.put_column(column.renamed(&mapping.concept))?;
        }
        Ok(())
    }

    /// Harmonized values when available, raw otherwise; the description is
    /// always the raw variable's.
    fn concept_source(&self, raw: LabeledColumn) -> LabeledColumn {
        let harmonized = self
            .harmonized
            .get(&raw.name().to_ascii_uppercase())
            .and_then(|name| self.output.column(name));
        match harmonized {
            Some(column) => LabeledColumn {
                data: column.data,
                description: raw.description,
                value_labels: column.value_labels,
            },
            None => raw,
        }
    }
}

fn audit_description(raw: Option<&str>, member: &FamilyVariable, spec: ScaleSpec) -> String {
    let label = raw
        .or(member.concept.as_deref())
        .unwrap_or(member.variable.as_str());
    let action = if spec.needs_reversal() {
        "reversed"
    } else {
        "kept"
    };
    format!(
        "{label} {HARMONIZED_MARKER}higher_is_more_positive, {}, source {}, {action}]",
        spec.width, spec.direction_in_wave
    )
}
