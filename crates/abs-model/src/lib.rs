//! Data model for cross-wave survey harmonization.
//!
//! The types here describe survey administrations ([`Wave`]), the labeled
//! columns a loader hands over ([`LabeledColumn`], [`WaveDataset`]), the
//! registry rows that tie one construct to its per-wave variables
//! ([`ConceptMapping`], [`ScaleFamily`]), and the non-fatal findings a run
//! accumulates ([`Diagnostic`], [`DiagnosticReport`]).

pub mod concept;
pub mod dataset;
pub mod diagnostic;
pub mod error;
pub mod labels;
pub mod lookup;
pub mod scale;
pub mod wave;

pub use concept::{CanonicalDirection, ConceptMapping, Domain, FamilyWave, ScaleFamily};
pub use dataset::WaveDataset;
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticReport, Severity};
pub use error::{ModelError, Result};
pub use labels::{ColumnMeta, LabeledColumn, ValueLabels};
pub use lookup::CaseInsensitiveSet;
pub use scale::{Direction, MissingPolicyKind, ScaleSpec, ScaleWidth};
pub use wave::Wave;

/// Suffix appended to a raw variable name for its harmonized column.
pub const HARMONIZED_SUFFIX: &str = "_harm";

/// Name of the harmonized column derived from `variable`.
pub fn harmonized_name(variable: &str) -> String {
    format!("{variable}{HARMONIZED_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmonized_name_appends_suffix() {
        assert_eq!(harmonized_name("q7"), "q7_harm");
    }
}
