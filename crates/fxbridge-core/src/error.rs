use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed query result: {0}")]
    Parse(String),

    #[error("Invalid currency pair: {0:?}")]
    InvalidPair(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No query result after {0} seconds")]
    Timeout(u64),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("A fetch is already in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        BridgeError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
