use std::path::Path;
use std::time::Instant;

use abs_cli::output::write_outputs;
use abs_cli::registry::load_registry;
use abs_core::{ConceptAccessor, ConceptFetch, ConceptStatus, harmonize_study, render_codebook};
use abs_ingest::load_study;
use abs_model::{DiagnosticReport, HARMONIZED_SUFFIX, Severity, WaveDataset};
use abs_registry::ConceptRegistry;
use abs_transform::HarmonizeOptions;
use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use crate::cli::{ConceptArgs, ConceptsArgs, HarmonizeArgs, RegistryArgs};
use crate::summary::apply_table_style;
use crate::types::{ConceptResult, ConceptWaveRow, HarmonizeResult, WaveSummary};

fn registry_from_args(args: &RegistryArgs) -> Result<ConceptRegistry> {
    load_registry(args.registry.as_deref(), args.families.as_deref())
}

fn load_waves(data_dir: &Path) -> Result<Vec<WaveDataset>> {
    let span = info_span!("ingest", data_dir = %data_dir.display());
    let start = Instant::now();
    let waves = span
        .in_scope(|| load_study(data_dir))
        .with_context(|| format!("load waves from {}", data_dir.display()))?;
    info!(
        waves = waves.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(waves)
}

pub fn run_harmonize(args: &HarmonizeArgs) -> Result<HarmonizeResult> {
    let data_dir = &args.data_dir;
    let run_span = info_span!("run", data_dir = %data_dir.display());
    let _run_guard = run_span.enter();

    let registry = registry_from_args(&args.registry)?;
    let options = HarmonizeOptions::default().with_parallel(args.parallel);
    let waves = load_waves(data_dir)?;

    let start = Instant::now();
    let outcome = harmonize_study(waves, &registry, &options).context("harmonize study")?;
    info!(
        rows = outcome.assembled.height(),
        diagnostics = outcome.report.len(),
        duration_ms = start.elapsed().as_millis(),
        "harmonization complete"
    );

    let outputs = if args.dry_run {
        None
    } else {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("harmonized"));
        let span = info_span!("output", dir = %output_dir.display());
        Some(span.in_scope(|| write_outputs(&output_dir, &outcome, &registry, &options))?)
    };

    let waves = outcome
        .waves
        .iter()
        .map(|(wave, dataset)| {
            let in_wave: Vec<_> = outcome.report.for_wave(*wave).collect();
            WaveSummary {
                wave: *wave,
                rows: dataset.row_count(),
                columns: dataset.data.width(),
                harmonized: dataset
                    .column_names()
                    .iter()
                    .filter(|name| name.ends_with(HARMONIZED_SUFFIX))
                    .count(),
                warnings: in_wave
                    .iter()
                    .filter(|d| d.severity == Severity::Warning)
                    .count(),
                infos: in_wave
                    .iter()
                    .filter(|d| d.severity == Severity::Info)
                    .count(),
            }
        })
        .collect();

    Ok(HarmonizeResult {
        data_dir: data_dir.clone(),
        outputs,
        fingerprint: outcome.fingerprint.clone(),
        waves,
        total_rows: outcome.assembled.height(),
        total_columns: outcome.assembled.data.width(),
        report: outcome.report,
    })
}

pub fn run_concepts(args: &ConceptsArgs) -> Result<()> {
    let registry = registry_from_args(&args.registry)?;
    let mut table = Table::new();
    table.set_header(vec!["Concept", "Domain", "Scale", "Waves", "Description"]);
    apply_table_style(&mut table);
    for mapping in registry.concepts() {
        if args.domain.is_some_and(|domain| mapping.domain != domain) {
            continue;
        }
        if args.wave.is_some_and(|wave| !mapping.is_mapped_in(wave)) {
            continue;
        }
        let waves = mapping
            .waves()
            .map(|wave| wave.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            mapping.concept.clone(),
            mapping.domain.to_string(),
            mapping.scale_type.clone(),
            waves,
            mapping.description.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_codebook(args: &RegistryArgs) -> Result<()> {
    let registry = registry_from_args(args)?;
    println!("{}", render_codebook(&registry));
    println!();
    println!("Registry fingerprint: {}", registry.fingerprint());
    Ok(())
}

pub fn run_concept(args: &ConceptArgs) -> Result<ConceptResult> {
    let concept = args.name.as_str();
    let span = info_span!("concept", concept);
    let _guard = span.enter();

    let registry = registry_from_args(&args.registry)?;
    let mapping = registry
        .get(concept)
        .with_context(|| format!("look up concept {concept}"))?;
    let description = mapping.description.clone();

    let options = HarmonizeOptions::default();
    let waves = load_waves(&args.data_dir)?;
    let outcome = harmonize_study(waves, &registry, &options).context("harmonize study")?;

    let accessor = ConceptAccessor::with_options(&registry, &options);
    let mut rows = Vec::new();
    let mut report = DiagnosticReport::new();
    for (wave, dataset) in &outcome.waves {
        let status = accessor.validate_concept(dataset, concept)?;
        let variable = match &status {
            ConceptStatus::Available { variable } => Some(variable.clone()),
            ConceptStatus::NotMapped { .. } => None,
            ConceptStatus::VariableMissing { variable, .. } => Some(variable.clone()),
        };
        let rows_in_wave = dataset.row_count();
        let absent = match accessor.get_concept(dataset, concept, args.clean)? {
            ConceptFetch::Found { column, diagnostic } => {
                if let Some(diagnostic) = diagnostic {
                    report.push(diagnostic);
                }
                column.absent_count()
            }
            ConceptFetch::Absent(diagnostic) => {
                report.push(diagnostic);
                rows_in_wave
            }
        };
        rows.push(ConceptWaveRow {
            wave: *wave,
            variable,
            status: if status.is_available() {
                "available".to_string()
            } else {
                status.to_string()
            },
            rows: rows_in_wave,
            absent,
        });
    }

    Ok(ConceptResult {
        concept: concept.to_string(),
        description,
        rows,
        report,
    })
}
