#![deny(unsafe_code)]

pub mod csv;
pub mod embedded;
pub mod error;
pub mod families;
pub mod hash;
pub mod registry;

pub use crate::csv::concepts::{parse_concepts_csv, parse_concepts_reader};
pub use crate::error::RegistryError;
pub use crate::families::{parse_families_str, parse_families_toml};
pub use crate::registry::{ConceptRegistry, FamilyVariable};
