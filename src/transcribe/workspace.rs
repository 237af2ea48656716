use std::io;
use std::path::{Path, PathBuf};

/// Failure while giving a job a clean output directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryResetError {
    #[error("failed to clear output directory {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to lock output directory {}: {source}", path.display())]
    Lock {
        /// The lock file, which sits beside the directory.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any previous contents are already gone at this point.
    #[error("failed to create output directory {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Remove `dir` and everything under it, then create it again (with parents).
///
/// Afterwards the directory exists and is empty, so nothing from an earlier
/// job can be mistaken for this job's output.
pub fn reset_output_dir(dir: &Path) -> Result<(), DirectoryResetError> {
    // Anything we cannot stat is treated as absent; creation reports the cause.
    if let Ok(meta) = std::fs::symlink_metadata(dir) {
        let removed = if meta.is_dir() {
            std::fs::remove_dir_all(dir)
        } else {
            std::fs::remove_file(dir)
        };
        removed.map_err(|source| DirectoryResetError::Remove {
            path: dir.to_path_buf(),
            source,
        })?;
        tracing::debug!("Removed previous output at {}", dir.display());
    }

    std::fs::create_dir_all(dir).map_err(|source| DirectoryResetError::Create {
        path: dir.to_path_buf(),
        source,
    })
}

/// A fresh per-job directory under `base`, e.g.
/// `job-20260214-093012-6f1c0d2e8a9b4c67b1e2f3a4b5c6d7e8`. The random suffix
/// keeps separate processes started in the same second apart.
pub fn unique_job_dir(base: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    base.join(format!("job-{}-{}", stamp, uuid::Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_creates_missing_parents() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b").join("c");
        reset_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_reset_clears_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        std::fs::create_dir_all(dir.join("old_clip")).unwrap();
        std::fs::write(dir.join("old_clip").join("out.srt"), "1\n").unwrap();
        std::fs::write(dir.join("out.txt"), "stale").unwrap();

        reset_output_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_reset_replaces_plain_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        std::fs::write(&dir, "not a directory").unwrap();

        reset_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_create_failure_is_reported_distinctly() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file in the way").unwrap();
        // A parent segment is a regular file, so creation cannot succeed.
        let dir = blocker.join("out");

        let err = reset_output_dir(&dir).unwrap_err();
        match err {
            DirectoryResetError::Create { path, .. } => assert_eq!(path, dir),
            other => panic!("expected Create error, got {:?}", other),
        }
    }

    #[test]
    fn test_unique_job_dirs_differ_within_one_second() {
        let base = Path::new("/tmp/base");
        let dirs: std::collections::HashSet<PathBuf> =
            (0..200).map(|_| unique_job_dir(base)).collect();
        assert_eq!(dirs.len(), 200);

        let a = dirs.iter().next().unwrap();
        assert!(a.starts_with(base));
        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("job-"));
        // job-YYYYMMDD-HHMMSS-<32 hex digits>
        let suffix = name.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
