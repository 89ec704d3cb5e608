mod error;
mod paths;
mod progress;

pub use error::StoreError;
pub use paths::StepwisePaths;
pub use progress::ProgressStore;

use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(|e| StoreError::io("create dir", parent, e))?;
    let mut tmp =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| StoreError::io("create temp file in", parent, e))?;
    tmp.write_all(data)
        .and_then(|_| tmp.flush())
        .map_err(|e| StoreError::io("write", tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io("replace", path, e.error))?;
    Ok(())
}

/// File-based exclusive lock guard. Released on drop.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock, blocking until it is free.
/// Creates the lock file if needed.
pub fn lock_file(path: &Path) -> Result<LockGuard, StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io("create dir", parent, e))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|e| StoreError::io("open lock file", path, e))?;
    file.lock_exclusive()
        .map_err(|e| StoreError::io("lock", path, e))?;
    Ok(LockGuard { _file: file })
}
