use std::path::{Path, PathBuf};

use stepwise_core::{Progress, ProgressData, ProgressStats, TutorialProgress};

use crate::{lock_file, write_atomic, StoreError};

/// JSON-file progress store: one object of slug → completion record.
///
/// Reads never fail: a missing file is empty progress, an unreadable or
/// corrupt one is logged and treated as empty. Writes take the lock file
/// for the whole read-modify-write.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl ProgressStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = path.with_extension("lock");
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all progress data.
    pub fn load(&self) -> ProgressData {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ProgressData::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read progress, starting empty");
                return ProgressData::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt progress file, starting empty");
                ProgressData::new()
            }
        }
    }

    /// Replace all progress data.
    pub fn save(&self, data: &ProgressData) -> Result<(), StoreError> {
        let _lock = lock_file(&self.lock_path)?;
        self.write(data)
    }

    fn write(&self, data: &ProgressData) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), entries = data.len(), "saved progress");
        Ok(())
    }

    /// Mark a tutorial complete, overwriting any previous record.
    pub fn mark_complete(
        &self,
        slug: &str,
        time_spent: Option<u64>,
    ) -> Result<TutorialProgress, StoreError> {
        let record = TutorialProgress {
            completed: true,
            timestamp: now_rfc3339()?,
            time_spent,
        };
        let _lock = lock_file(&self.lock_path)?;
        let mut data = self.load();
        data.insert(slug, record.clone());
        self.write(&data)?;
        Ok(record)
    }

    /// Remove a tutorial's record. Returns whether one existed.
    pub fn mark_incomplete(&self, slug: &str) -> Result<bool, StoreError> {
        let _lock = lock_file(&self.lock_path)?;
        let mut data = self.load();
        let existed = data.remove(slug).is_some();
        self.write(&data)?;
        Ok(existed)
    }

    pub fn is_complete(&self, slug: &str) -> bool {
        self.load().is_completed(slug)
    }

    pub fn get(&self, slug: &str) -> Option<TutorialProgress> {
        self.load().get(slug).cloned()
    }

    pub fn stats<S: AsRef<str>>(&self, all_slugs: &[S]) -> ProgressStats {
        self.load().stats(all_slugs)
    }

    /// Delete all progress. A missing file is already clear.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _lock = lock_file(&self.lock_path)?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io("remove", &self.path, e)),
        }
    }

    /// Pretty-printed JSON of everything stored.
    pub fn export(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.load())?)
    }

    /// Replace stored progress with `json`. Invalid input leaves the store
    /// untouched. Returns the number of records imported.
    pub fn import(&self, json: &str) -> Result<usize, StoreError> {
        let data: ProgressData = serde_json::from_str(json)?;
        self.save(&data)?;
        Ok(data.len())
    }
}

fn now_rfc3339() -> Result<String, StoreError> {
    let now = time::OffsetDateTime::now_utc();
    Ok(now.format(&time::format_description::well_known::Rfc3339)?)
}
