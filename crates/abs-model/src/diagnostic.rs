//! Non-fatal findings recorded while harmonizing and querying waves.
//!
//! Missing mappings, absent variables and unlabeled columns are expected in
//! a multi-wave survey; they become [`Diagnostic`] values that accumulate in
//! a [`DiagnosticReport`] while processing continues.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wave::Wave;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The registry names a variable the loaded wave does not contain.
    VariableMissing,
    /// The concept has no variable for this wave.
    ConceptNotMapped,
    /// Label-based cleaning was requested on a column without value labels.
    NoValueLabels,
    /// A family has no scale entry for this wave.
    FamilyNotConfigured,
    /// A family variable holds values that are not integer codes.
    NonNumericScale,
    /// Waves disagree on a column's type; values were widened to text.
    SchemaMismatch,
    /// No wave produced data for a concept.
    NoWaveData,
    /// A derived column name is already taken by a raw column.
    ColumnCollision,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::VariableMissing => "variable_missing",
            DiagnosticKind::ConceptNotMapped => "concept_not_mapped",
            DiagnosticKind::NoValueLabels => "no_value_labels",
            DiagnosticKind::FamilyNotConfigured => "family_not_configured",
            DiagnosticKind::NonNumericScale => "non_numeric_scale",
            DiagnosticKind::SchemaMismatch => "schema_mismatch",
            DiagnosticKind::NoWaveData => "no_wave_data",
            DiagnosticKind::ColumnCollision => "column_collision",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticKind::ConceptNotMapped | DiagnosticKind::FamilyNotConfigured => {
                Severity::Info
            }
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave: Option<Wave>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            wave: None,
            concept: None,
            variable: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn in_wave(mut self, wave: Wave) -> Self {
        self.wave = Some(wave);
        self
    }

    #[must_use]
    pub fn for_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    #[must_use]
    pub fn for_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(wave) = self.wave {
            write!(f, "[{wave}] ")?;
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Accumulated diagnostics of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: DiagnosticReport) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .count()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn by_kind(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn for_wave(&self, wave: Wave) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.wave == Some(wave))
    }
}

impl FromIterator<Diagnostic> for DiagnosticReport {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}
