use thiserror::Error;

use crate::wave::Wave;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown wave '{0}' (expected one of W2, W3, W4, W5, W6)")]
    UnknownWave(String),
    #[error("unsupported scale width {0} (expected 4, 5 or 6)")]
    UnsupportedWidth(i64),
    #[error("unknown domain '{0}'")]
    UnknownDomain(String),
    #[error("column '{column}' in {wave} has {actual} rows, dataset has {expected}")]
    RowCountMismatch {
        wave: Wave,
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate column '{column}' in {wave}")]
    DuplicateColumn { wave: Wave, column: String },
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, ModelError>;
