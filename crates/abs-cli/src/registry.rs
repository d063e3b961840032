//! Registry loading for the CLI: user files where given, the built-in
//! tables otherwise.

use std::path::Path;

use abs_registry::embedded::{embedded_concepts_csv, embedded_families_toml};
use abs_registry::{
    ConceptRegistry, parse_concepts_csv, parse_concepts_reader, parse_families_str,
    parse_families_toml,
};
use anyhow::{Context, Result};
use tracing::info;

/// Builds the run's registry.
///
/// Either source may be overridden on its own; the other falls back to the
/// compiled-in table.
pub fn load_registry(concepts: Option<&Path>, families: Option<&Path>) -> Result<ConceptRegistry> {
    let concept_rows = match concepts {
        Some(path) => parse_concepts_csv(path)
            .with_context(|| format!("load concept registry {}", path.display()))?,
        None => parse_concepts_reader(embedded_concepts_csv().as_bytes(), "embedded concepts.csv")
            .context("load embedded concept registry")?,
    };
    let family_rows = match families {
        Some(path) => parse_families_toml(path)
            .with_context(|| format!("load scale families {}", path.display()))?,
        None => parse_families_str(embedded_families_toml(), "embedded scale_families.toml")
            .context("load embedded scale families")?,
    };
    let registry =
        ConceptRegistry::new(concept_rows, family_rows).context("validate concept registry")?;
    info!(
        concepts = registry.len(),
        families = registry.families().len(),
        fingerprint = %registry.fingerprint(),
        "registry loaded"
    );
    Ok(registry)
}
