// crates/sood-core/src/error.rs

use sood_loader::LoaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration could not be parsed: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Source loading failed: {0}")]
    Loader(#[from] LoaderError),

    #[error("No source files could be loaded from {0}")]
    NoSourcesLoaded(String),

    #[error("Report formatting failed")]
    Format(#[from] std::fmt::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
