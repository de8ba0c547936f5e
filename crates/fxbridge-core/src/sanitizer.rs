use std::path::PathBuf;

use tracing::{info, warn};

use crate::artifacts::{self, ArtifactPaths};

/// What a startup sweep did with each artifact.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SanitizeReport {
    pub removed: Vec<PathBuf>,
    pub absent: Vec<PathBuf>,
    /// Artifacts that could not be removed, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Delete any artifacts left behind by a previous run.
///
/// Never fails: a missing artifact is the common case and any other
/// deletion error is logged and recorded in the report.
pub async fn sanitize(paths: &ArtifactPaths) -> SanitizeReport {
    let mut report = SanitizeReport::default();

    for path in paths.all() {
        match artifacts::remove(path).await {
            Ok(true) => {
                info!(path = %path.display(), "Removed stale artifact");
                report.removed.push(path.to_path_buf());
            }
            Ok(false) => {
                info!(path = %path.display(), "No stale artifact to remove");
                report.absent.push(path.to_path_buf());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not remove stale artifact");
                report.skipped.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());

        let report = sanitize(&paths).await;
        assert!(report.removed.is_empty());
        assert_eq!(report.absent.len(), 3);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn removes_all_three_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        for path in paths.all() {
            std::fs::write(path, b"stale").unwrap();
        }

        let report = sanitize(&paths).await;
        assert_eq!(report.removed.len(), 3);
        for path in paths.all() {
            assert!(!path.exists(), "{} should be gone", path.display());
        }
    }

    #[tokio::test]
    async fn leaves_unrelated_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let other = dir.path().join("notes.txt");
        std::fs::write(&other, b"keep").unwrap();
        std::fs::write(&paths.trade_order, b"{}").unwrap();

        let report = sanitize(&paths).await;
        assert_eq!(report.removed, vec![paths.trade_order.clone()]);
        assert!(other.exists());
    }

    #[tokio::test]
    async fn undeletable_artifact_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        // A directory in place of the file cannot be removed with remove_file.
        std::fs::create_dir(&paths.query_result).unwrap();

        let report = sanitize(&paths).await;
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, paths.query_result);
        assert!(!report.is_clean());
    }
}
