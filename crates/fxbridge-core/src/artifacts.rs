use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fxbridge_models::config::ArtifactConfig;

use crate::error::BridgeError;

/// Resolved locations of the three well-known artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub query_request: PathBuf,
    pub query_result: PathBuf,
    pub trade_order: PathBuf,
}

impl ArtifactPaths {
    pub fn from_config(config: &ArtifactConfig) -> Self {
        let dir = Path::new(&config.dir);
        Self {
            query_request: dir.join(&config.query_request),
            query_result: dir.join(&config.query_result),
            trade_order: dir.join(&config.trade_order),
        }
    }

    /// Default file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::from_config(&ArtifactConfig {
            dir: dir.as_ref().to_string_lossy().into_owned(),
            ..ArtifactConfig::default()
        })
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.query_request, &self.query_result, &self.trade_order]
    }
}

/// Replace the whole file with `contents`.
pub async fn write(path: &Path, contents: &[u8]) -> Result<(), BridgeError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| BridgeError::io(path, e))
}

pub async fn read(path: &Path) -> Result<Vec<u8>, BridgeError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| BridgeError::io(path, e))
}

pub async fn exists(path: &Path) -> Result<bool, BridgeError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| BridgeError::io(path, e))
}

/// Delete `path`. Returns `false` when there was nothing to delete.
pub async fn remove(path: &Path) -> Result<bool, BridgeError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BridgeError::io(path, e)),
    }
}
