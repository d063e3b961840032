//! Error types for wave ingestion.

use std::path::PathBuf;

use abs_model::Wave;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("CSV file has an empty column name: {path}")]
    EmptyColumnName { path: PathBuf },

    #[error("failed to parse label sidecar {path}: {source}")]
    Sidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{wave} matches both {first} and {second}")]
    DuplicateWave {
        wave: Wave,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no wave files (names containing W2..W6) in {path}")]
    NoWaveFiles { path: PathBuf },
}

impl IngestError {
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
