use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The dataset source could not be read. Fatal, never retried.
    #[error("Dataset unavailable at {path:?}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("Document index out of range: {index} (corpus has {len} documents)")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
