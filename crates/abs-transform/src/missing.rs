//! Missing-value resolution.
//!
//! Survey files encode non-substantive answers in two ways: reserved numeric
//! codes (`0`, `97`, `98`, `99`) and codes whose value label says so
//! ("Don't know", "Refused"). A [`MissingPolicy`] names which of the two to
//! honour for a column; [`resolve_missing`] applies it.

use std::collections::BTreeSet;

use abs_common::parse_i64;
use abs_model::{Diagnostic, DiagnosticKind, LabeledColumn, ValueLabels};
use polars::prelude::{Column, DataType};

use crate::error::Result;

/// Sentinel codes treated as absent unless a family overrides them.
pub const DEFAULT_SENTINELS: [i64; 4] = [0, 97, 98, 99];

/// Value-label texts that mark a code as a non-answer. Matched exactly.
pub const DEFAULT_MISSING_LABELS: &[&str] = &[
    "Missing",
    "Don't know",
    "Do not know",
    "Can't choose",
    "Can't determine",
    "Decline to answer",
    "Refused",
    "No answer",
    "Not applicable",
    "Do not understand the question",
    "Not asked in this country",
];

/// How absent responses are recognised in one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Values equal to a sentinel become absent.
    Numeric { sentinels: BTreeSet<i64> },
    /// Codes whose label text is in the catalog become absent.
    Label { labels: BTreeSet<String> },
    /// Sentinels first, then the label catalog.
    NumericThenLabel {
        sentinels: BTreeSet<i64>,
        labels: BTreeSet<String>,
    },
}

impl MissingPolicy {
    pub fn numeric(sentinels: impl IntoIterator<Item = i64>) -> Self {
        MissingPolicy::Numeric {
            sentinels: sentinels.into_iter().collect(),
        }
    }

    pub fn label<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        MissingPolicy::Label {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn default_label() -> Self {
        Self::label(DEFAULT_MISSING_LABELS.iter().copied())
    }

    pub fn sentinels(&self) -> Option<&BTreeSet<i64>> {
        match self {
            MissingPolicy::Numeric { sentinels }
            | MissingPolicy::NumericThenLabel { sentinels, .. } => Some(sentinels),
            MissingPolicy::Label { .. } => None,
        }
    }

    pub fn labels(&self) -> Option<&BTreeSet<String>> {
        match self {
            MissingPolicy::Label { labels } | MissingPolicy::NumericThenLabel { labels, .. } => {
                Some(labels)
            }
            MissingPolicy::Numeric { .. } => None,
        }
    }
}

impl Default for MissingPolicy {
    fn default() -> Self {
        Self::numeric(DEFAULT_SENTINELS)
    }
}

/// A cleaned column and the diagnostic raised while cleaning it, if any.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub column: LabeledColumn,
    pub diagnostic: Option<Diagnostic>,
}

/// Replaces missing-indicating values with absent.
///
/// Values that are not missing pass through unchanged, out-of-range ones
/// included. Under a label policy a column without value labels comes back
/// unchanged with a single [`DiagnosticKind::NoValueLabels`] diagnostic.
/// Value labels and description are carried over as they are.
pub fn resolve_missing(column: &LabeledColumn, policy: &MissingPolicy) -> Result<Resolved> {
    let mut codes = policy.sentinels().cloned().unwrap_or_default();
    let mut diagnostic = None;

    if let Some(catalog) = policy.labels() {
        match column.labels() {
            Some(labels) => codes.extend(labeled_missing_codes(labels, catalog)),
            None => {
                diagnostic = Some(
                    Diagnostic::new(
                        DiagnosticKind::NoValueLabels,
                        format!(
                            "{} has no value labels; label-based missing values left as-is",
                            column.name()
                        ),
                    )
                    .for_variable(column.name()),
                );
            }
        }
    }

    let data = null_codes(&column.data, &codes)?;
    Ok(Resolved {
        column: LabeledColumn {
            data,
            description: column.description.clone(),
            value_labels: column.value_labels.clone(),
        },
        diagnostic,
    })
}

/// Codes whose label text is listed in `catalog`.
pub fn labeled_missing_codes(labels: &ValueLabels, catalog: &BTreeSet<String>) -> BTreeSet<i64> {
    labels
        .iter()
        .filter(|(_, text)| catalog.contains(*text))
        .map(|(code, _)| code)
        .collect()
}

fn null_codes(column: &Column, codes: &BTreeSet<i64>) -> Result<Column> {
    if codes.is_empty() {
        return Ok(column.clone());
    }
    let name = column.name().clone();
    let dtype = column.dtype();

    if dtype.is_integer() {
        let cast = column.cast(&DataType::Int64)?;
        let values: Vec<Option<i64>> = cast
            .as_materialized_series()
            .i64()?
            .into_iter()
            .map(|value| value.filter(|code| !codes.contains(code)))
            .collect();
        return Ok(Column::new(name, values));
    }

    if dtype.is_float() {
        let cast = column.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = cast
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| !is_float_code(*v, codes)))
            .collect();
        return Ok(Column::new(name, values));
    }

    if dtype == &DataType::String {
        let values: Vec<Option<&str>> = column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|value| value.filter(|s| !parse_i64(s).is_some_and(|code| codes.contains(&code))))
            .collect();
        return Ok(Column::new(name, values));
    }

    Ok(column.clone())
}

fn is_float_code(value: f64, codes: &BTreeSet<i64>) -> bool {
    value.is_finite() && value.fract() == 0.0 && codes.contains(&(value as i64))
}
