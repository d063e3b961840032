//! Study-level harmonization: every wave, then assembly.

use std::collections::{BTreeMap, BTreeSet};

use abs_model::{DiagnosticReport, Wave, WaveDataset};
use abs_registry::ConceptRegistry;
use abs_transform::{HarmonizeOptions, Harmonized, TransformError, harmonize};
use rayon::prelude::*;
use tracing::{info, info_span};

use crate::assemble::{AssembledDataset, assemble};
use crate::error::{CoreError, Result};

/// Result of harmonizing a whole study.
#[derive(Debug, Clone)]
pub struct StudyOutcome {
    /// Harmonized waves, keyed in canonical order.
    pub waves: BTreeMap<Wave, WaveDataset>,
    pub assembled: AssembledDataset,
    /// Diagnostics of every wave in canonical order, then of assembly.
    pub report: DiagnosticReport,
    /// Fingerprint of the registry the outcome was derived from.
    pub fingerprint: String,
}

/// Harmonizes each wave and stacks the results.
///
/// Waves are independent, so with `options.parallel` they are harmonized on
/// the rayon pool; the outcome is identical either way. A wave supplied
/// twice is an error.
pub fn harmonize_study(
    waves: Vec<WaveDataset>,
    registry: &ConceptRegistry,
    options: &HarmonizeOptions,
) -> Result<StudyOutcome> {
    let span = info_span!("harmonize_study", waves = waves.len(), parallel = options.parallel);
    let _guard = span.enter();

    let mut seen = BTreeSet::new();
    for dataset in &waves {
        if !seen.insert(dataset.wave) {
            return Err(CoreError::DuplicateWave(dataset.wave));
        }
    }

    let harmonized: Vec<Harmonized> = if options.parallel {
        waves
            .par_iter()
            .map(|dataset| harmonize(dataset, registry, options))
            .collect::<std::result::Result<_, TransformError>>()?
    } else {
        waves
            .iter()
            .map(|dataset| harmonize(dataset, registry, options))
            .collect::<std::result::Result<_, TransformError>>()?
    };

    let by_wave: BTreeMap<Wave, Harmonized> = harmonized
        .into_iter()
        .map(|h| (h.dataset.wave, h))
        .collect();
    let mut report = DiagnosticReport::new();
    let mut datasets = BTreeMap::new();
    for (wave, outcome) in by_wave {
        report.extend(outcome.report);
        datasets.insert(wave, outcome.dataset);
    }

    let assembled = assemble(&datasets)?;
    report.extend(assembled.report);
    info!(
        rows = assembled.dataset.height(),
        warnings = report.warning_count(),
        "study harmonized"
    );

    Ok(StudyOutcome {
        waves: datasets,
        assembled: assembled.dataset,
        report,
        fingerprint: registry.fingerprint(),
    })
}
