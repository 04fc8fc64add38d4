use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct LoaderAttempt {
    pub loader: &'static str,
    pub message: String,
}

impl LoaderAttempt {
    pub fn new(loader: &'static str, message: impl Into<String>) -> Self {
        Self {
            loader,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoaderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loader, self.message)
    }
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("{loader} format mismatch: {reason}")]
    FormatMismatch {
        loader: &'static str,
        reason: String,
    },

    #[error("{loader} failed to read {}: {source}", path.display())]
    Io {
        loader: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{loader} CSV error: {source}")]
    Csv {
        loader: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{loader} spreadsheet error: {source}")]
    Spreadsheet {
        loader: &'static str,
        #[source]
        source: calamine::Error,
    },

    #[error("{loader} {} has no header row", path.display())]
    MissingHeader { loader: &'static str, path: PathBuf },

    #[error("{loader} file did not contain any data rows")]
    EmptyData { loader: &'static str },

    #[error("no loader recognized {}; attempts: {attempts:?}", path.display())]
    NoMatchingLoader {
        path: PathBuf,
        attempts: Vec<LoaderAttempt>,
    },

    #[error("unable to determine survey year from file name '{file}'")]
    UnknownYear { file: String },
}
