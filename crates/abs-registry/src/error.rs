#![deny(unsafe_code)]

use std::path::PathBuf;

use abs_model::Wave;

/// Configuration errors. Any of these means the registry is broken and no
/// harmonization may run.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {source_name}: {message}")]
    Csv {
        source_name: String,
        message: String,
    },

    #[error("failed to parse TOML {source_name}: {source}")]
    Toml {
        source_name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("malformed registry row {line} in {source_name}: {message}")]
    MalformedRow {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("unknown wave column '{column}' in {source_name}")]
    UnknownWaveColumn { source_name: String, column: String },

    #[error("unknown concept '{concept}'")]
    UnknownConcept { concept: String },

    #[error("duplicate concept '{concept}'")]
    DuplicateConcept { concept: String },

    #[error("duplicate scale family '{name}'")]
    DuplicateFamily { name: String },

    #[error("concept '{concept}' has no variable in any wave")]
    UnmappedConcept { concept: String },

    #[error("variable {variable} in {wave} is claimed by families '{first}' and '{second}'")]
    ConflictingFamilies {
        wave: Wave,
        variable: String,
        first: String,
        second: String,
    },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
