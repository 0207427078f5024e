use crate::error::StoreError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Atomic replacement of a document on disk.
///
/// Data goes to `<target>.lock` first and is renamed over `<target>` on
/// commit, so readers see either the old or the new document. The lock
/// file is removed on drop if not committed. A lock left behind by an
/// earlier crash is stale and gets overwritten; there is only ever one
/// writer per data directory.
pub struct Lockfile {
    target: PathBuf,
    lock_path: PathBuf,
    file: Option<fs::File>,
}

impl Lockfile {
    /// Open the lock file for the given target path, truncating any stale one.
    pub fn acquire(target: impl AsRef<Path>) -> Result<Self, StoreError> {
        let target = target.as_ref().to_path_buf();
        let lock_path = target.with_extension(
            target
                .extension()
                .map(|e| format!("{}.lock", e.to_string_lossy()))
                .unwrap_or_else(|| "lock".to_string()),
        );

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if lock_path.exists() {
            warn!(lock = %lock_path.display(), "overwriting stale lock file");
        }
        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)?;
        Ok(Self {
            target,
            lock_path,
            file: Some(file),
        })
    }

    /// Replace `target` with `data` in one step.
    pub fn replace(target: impl AsRef<Path>, data: &[u8]) -> Result<(), StoreError> {
        let mut lock = Self::acquire(target)?;
        lock.write_all(data)?;
        lock.commit()
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), StoreError> {
        match self.file {
            Some(ref mut file) => {
                file.write_all(data)?;
                file.flush()?;
                Ok(())
            }
            None => Err(StoreError::LockConflict(
                "lock file already committed or dropped".into(),
            )),
        }
    }

    /// Sync the data to disk and rename the lock file over the target.
    pub fn commit(mut self) -> Result<(), StoreError> {
        if let Some(file) = &self.file {
            // On error `self` still owns the handle and Drop removes the lock.
            file.sync_all()?;
        }
        self.file.take();
        if let Err(e) = fs::rename(&self.lock_path, &self.target) {
            let _ = fs::remove_file(&self.lock_path);
            return Err(StoreError::Io(e));
        }
        Ok(())
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if self.file.is_some() {
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}
