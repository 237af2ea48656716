use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, OnceLock, PoisonError};

use fs4::fs_std::FileExt;

use crate::transcribe::workspace::DirectoryResetError;

/// Serializes jobs that share an output directory.
///
/// Threads in one process wait on an in-process registry. Other processes
/// are kept out by an exclusive OS lock on `<dir>.lock`, a file next to the
/// directory so that resetting the directory never removes it.
#[derive(Debug, Default)]
pub struct DirectoryLocks {
    held: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

/// Ownership of one output directory. Released on drop.
#[derive(Debug)]
pub struct DirectoryGuard<'a> {
    locks: &'a DirectoryLocks,
    key: PathBuf,
    file: Option<File>,
}

impl DirectoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every orchestrator in this process.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<DirectoryLocks>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Block until no other job, in this process or another, owns `dir`.
    pub fn acquire(&self, dir: &Path) -> Result<DirectoryGuard<'_>, DirectoryResetError> {
        let key = lock_key(dir);
        {
            // A job that panicked mid-run leaves nothing to protect; the next
            // job resets the directory anyway.
            let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
            while held.contains(&key) {
                held = self
                    .released
                    .wait(held)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            held.insert(key.clone());
        }

        let mut guard = DirectoryGuard {
            locks: self,
            key,
            file: None,
        };
        guard.file = Some(lock_file(&guard.key)?);
        Ok(guard)
    }

    /// Number of directories currently owned through this registry.
    pub fn held_count(&self) -> usize {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for DirectoryGuard<'_> {
    fn drop(&mut self) {
        // Closing the file releases the OS lock.
        drop(self.file.take());
        let mut held = self
            .locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.key);
        self.locks.released.notify_all();
    }
}

fn lock_file(key: &Path) -> Result<File, DirectoryResetError> {
    let path = lock_file_path(key);
    let to_error = |source| DirectoryResetError::Lock {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(to_error)?;
    FileExt::lock_exclusive(&file).map_err(to_error)?;
    tracing::debug!("Locked {}", path.display());
    Ok(file)
}

/// `<dir>.lock` beside the directory. The lock file is left in place after
/// release; deleting it would let a waiting process lock a stale inode.
pub fn lock_file_path(dir: &Path) -> PathBuf {
    let key = lock_key(dir);
    match (key.parent(), key.file_name()) {
        (Some(parent), Some(name)) => {
            let mut name = name.to_os_string();
            name.push(".lock");
            parent.join(name)
        }
        _ => std::env::temp_dir().join("transcribe-runner-root.lock"),
    }
}

// Relative and absolute spellings of one directory share a lock.
fn lock_key(dir: &Path) -> PathBuf {
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}
