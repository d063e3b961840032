#![deny(unsafe_code)]

//! Registry tables compiled into the binary.

use crate::csv::concepts::parse_concepts_reader;
use crate::error::RegistryError;
use crate::families::parse_families_str;
use crate::registry::ConceptRegistry;

const CONCEPTS_CSV: &str = include_str!("../data/concepts.csv");
const SCALE_FAMILIES_TOML: &str = include_str!("../data/scale_families.toml");

impl ConceptRegistry {
    /// The registry shipped with the crate.
    pub fn embedded() -> Result<Self, RegistryError> {
        let concepts = parse_concepts_reader(CONCEPTS_CSV.as_bytes(), "embedded concepts.csv")?;
        let families = parse_families_str(SCALE_FAMILIES_TOML, "embedded scale_families.toml")?;
        Self::new(concepts, families)
    }
}

/// Raw text of the embedded concept table.
pub fn embedded_concepts_csv() -> &'static str {
    CONCEPTS_CSV
}

/// Raw text of the embedded scale-family table.
pub fn embedded_families_toml() -> &'static str {
    SCALE_FAMILIES_TOML
}
