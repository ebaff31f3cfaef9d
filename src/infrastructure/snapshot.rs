//! Whole-store snapshots on disk.
//!
//! A snapshot is written to a temporary file in the target directory, synced,
//! and renamed over the previous one, so readers only ever see a complete file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::domain::errors::DomainError;

#[derive(Debug, Clone)]
pub struct SnapshotManager {
    snapshot_path: PathBuf,
}

impl SnapshotManager {
    pub fn new<P: AsRef<Path>>(snapshot_path: P) -> Self {
        Self {
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn save<T: Serialize>(&self, value: &T) -> Result<(), DomainError> {
        let directory = match self.snapshot_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&directory).map_err(|e| {
            DomainError::storage(format!("failed to create snapshot directory: {e}"))
        })?;

        let serialized = rmp_serde::to_vec_named(value)
            .map_err(|e| DomainError::storage(format!("failed to serialize snapshot: {e}")))?;

        let temp_file = NamedTempFile::new_in(&directory)
            .map_err(|e| DomainError::storage(format!("failed to create temp file: {e}")))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            writer
                .write_all(&serialized)
                .map_err(|e| DomainError::storage(format!("failed to write snapshot: {e}")))?;
            writer
                .flush()
                .map_err(|e| DomainError::storage(format!("failed to flush snapshot: {e}")))?;
        }
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| DomainError::storage(format!("failed to sync snapshot: {e}")))?;
        temp_file
            .persist(&self.snapshot_path)
            .map_err(|e| DomainError::storage(format!("failed to rename snapshot: {e}")))?;

        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, DomainError> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }

        let data = fs::read(&self.snapshot_path)
            .map_err(|e| DomainError::storage(format!("failed to read snapshot: {e}")))?;
        let value = rmp_serde::from_slice(&data)
            .map_err(|e| DomainError::storage(format!("failed to deserialize snapshot: {e}")))?;

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_snapshot_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(dir.path().join("absent.snapshot"));

        let loaded: Option<BTreeMap<String, u32>> = manager.load().unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_replaces_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(dir.path().join("nested/store.snapshot"));

        let mut first = BTreeMap::new();
        first.insert("vehicles".to_string(), 1u32);
        manager.save(&first).unwrap();

        let mut second = first.clone();
        second.insert("sales".to_string(), 2);
        manager.save(&second).unwrap();

        let loaded: BTreeMap<String, u32> = manager.load().unwrap().unwrap();
        assert_eq!(loaded, second);
    }

    #[test]
    fn corrupt_snapshot_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.snapshot");
        fs::write(&path, b"\xc1 not msgpack").unwrap();

        let result: Result<Option<BTreeMap<String, u32>>, _> = SnapshotManager::new(path).load();
        assert!(matches!(result, Err(DomainError::Storage(_))));
    }
}
