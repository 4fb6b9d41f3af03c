//! Local mirror of every page
//!
//! After each change the builder hands its whole page map to a
//! [`BackupSink`]. The mirror is never read back automatically; it exists so
//! an operator can recover work by hand after a failed save.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::StoreError;
use crate::core::page::{PageKey, PageSequence};

/// Destination for the page map mirror
pub trait BackupSink: Send + Sync {
    fn mirror(&self, pages: &BTreeMap<PageKey, PageSequence>) -> Result<(), StoreError>;
}

fn encode(pages: &BTreeMap<PageKey, PageSequence>) -> Result<String, StoreError> {
    serde_json::to_string(pages).map_err(|e| StoreError::Backup(e.to_string()))
}

/// JSON file mirror, replaced atomically on every write
#[derive(Debug, Clone)]
pub struct FileBackup {
    path: PathBuf,
}

impl FileBackup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BackupSink for FileBackup {
    fn mirror(&self, pages: &BTreeMap<PageKey, PageSequence>) -> Result<(), StoreError> {
        let json = encode(pages)?;
        let temp = self.temp_path();
        fs::write(&temp, json.as_bytes())
            .and_then(|_| fs::rename(&temp, &self.path))
            .map_err(|e| StoreError::Backup(format!("{}: {}", self.path.display(), e)))
    }
}

/// Mirror kept in memory; clones share the latest snapshot
#[derive(Debug, Clone, Default)]
pub struct MemoryBackup {
    latest: Arc<Mutex<Option<String>>>,
    count: Arc<Mutex<usize>>,
}

impl MemoryBackup {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent snapshot as JSON.
    pub fn latest(&self) -> Option<String> {
        self.latest.lock().clone()
    }

    /// Number of snapshots taken.
    pub fn count(&self) -> usize {
        *self.count.lock()
    }
}

impl BackupSink for MemoryBackup {
    fn mirror(&self, pages: &BTreeMap<PageKey, PageSequence>) -> Result<(), StoreError> {
        let json = encode(pages)?;
        *self.latest.lock() = Some(json);
        *self.count.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{Block, TextBlock};

    fn sample() -> BTreeMap<PageKey, PageSequence> {
        let mut pages = BTreeMap::new();
        pages.insert(
            PageKey::Home,
            PageSequence::new(vec![Block::Text(TextBlock {
                content: "hello".into(),
            })]),
        );
        pages.insert(PageKey::Work, PageSequence::default());
        pages
    }

    #[test]
    fn test_file_backup_writes_keyed_json() {
        let dir = tempfile::tempdir().unwrap();
        let backup = FileBackup::new(dir.path().join("sitePages_backup.json"));
        backup.mirror(&sample()).unwrap();

        let raw = fs::read_to_string(backup.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["home"][0]["content"], "hello");
        assert_eq!(value["work"], serde_json::json!([]));
        assert!(!dir.path().join("sitePages_backup.json.tmp").exists());
    }

    #[test]
    fn test_file_backup_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let backup = FileBackup::new(dir.path().join("b.json"));
        backup.mirror(&sample()).unwrap();
        backup.mirror(&BTreeMap::new()).unwrap();
        assert_eq!(fs::read_to_string(backup.path()).unwrap(), "{}");
    }

    #[test]
    fn test_file_backup_missing_dir_is_error() {
        let backup = FileBackup::new("/nonexistent-dir/for/backup.json");
        assert!(matches!(
            backup.mirror(&sample()),
            Err(StoreError::Backup(_))
        ));
    }

    #[test]
    fn test_memory_backup_counts() {
        let backup = MemoryBackup::new();
        backup.mirror(&sample()).unwrap();
        backup.mirror(&sample()).unwrap();
        assert_eq!(backup.count(), 2);
        assert!(backup.latest().unwrap().contains("hello"));
    }
}
