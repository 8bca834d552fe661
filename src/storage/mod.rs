//! Durable storage for model snapshots
//!
//! The snapshot manager works against a small key-to-bytes store
//! abstraction, so the same save/backup/restore logic runs on local disk,
//! an object store adapter, or the in-memory fake used by tests.

pub mod manager;
pub mod snapshot;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix for in-flight writes; `list` never reports these.
const TMP_SUFFIX: &str = ".tmp";

/// Key-addressed blob storage.
///
/// `put` must be atomic: a reader never observes a half-written value
/// under the destination key, even if the writer dies mid-write.
pub trait BlobStore {
    /// Write a value under `key`, replacing any previous value
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Read the value under `key`, or `None` if absent
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove the value under `key`; absent keys are not an error
    fn delete(&mut self, key: &str) -> Result<()>;

    /// All keys currently present, in no particular order
    fn list(&self) -> Result<Vec<String>>;

    /// Whether `key` currently holds a value
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Blob store backed by one configured directory.
///
/// Writes land in a `.tmp` sibling first and are renamed into place, so
/// the destination file is either the old value or the new one, never a
/// torn write.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    /// Directory this store reads and writes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl BlobStore for DiskStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let target = self.path_for(key);
        let tmp = self.path_for(&format!("{key}{TMP_SUFFIX}"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(TMP_SUFFIX) {
                continue;
            }
            keys.push(name);
        }
        Ok(keys)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key).exists())
    }
}

/// In-memory blob store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.blobs.keys().cloned().collect())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.blobs.contains_key(key))
    }
}
