use abs_model::{ModelError, Wave};
use abs_registry::RegistryError;
use abs_transform::TransformError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("{wave} has a column named '{column}', which is reserved for the assembled dataset")]
    ReservedColumn { wave: Wave, column: String },
    #[error("dataset for {dataset} was supplied under the key {key}")]
    WaveMismatch { key: Wave, dataset: Wave },
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0} was supplied more than once")]
    DuplicateWave(Wave),
    #[error("assembled dataset has no column '{column}'")]
    MissingColumn { column: String },
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
