//! Canonical snapshot management with rotating backups
//!
//! One canonical key holds the live snapshot. Every save first copies the
//! previous snapshot to a timestamped backup key, then writes the new
//! snapshot atomically, then prunes backups oldest-first beyond the cap.

use chrono::Utc;

use super::snapshot::ModelSnapshot;
use super::BlobStore;
use crate::error::{Error, Result};
use crate::nn::network::Network;

/// Key of the live snapshot
pub const CANONICAL_KEY: &str = "model.json";

const BACKUP_INFIX: &str = ".backup.";

/// Backup tag format; lexicographic order equals chronological order.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%f";

/// One retained backup, identified by its timestamp tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// Sortable UTC tag taken from the key
    pub timestamp: String,
    /// Full store key of the backup
    pub key: String,
}

/// Saves, loads, lists and restores model snapshots on any [`BlobStore`].
pub struct SnapshotManager<S: BlobStore> {
    store: S,
    max_backups: usize,
}

impl<S: BlobStore> SnapshotManager<S> {
    /// Create a manager keeping at most `max_backups` backups
    pub fn new(store: S, max_backups: usize) -> Self {
        Self { store, max_backups }
    }

    /// Backup retention cap
    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist the network's current parameters.
    ///
    /// If a canonical snapshot already exists it is copied to a backup key
    /// first, so the state being replaced stays recoverable. The new
    /// snapshot then lands atomically under the canonical key, and backups
    /// beyond the cap are deleted oldest-first.
    pub fn save(&mut self, network: &Network) -> Result<()> {
        let bytes = network.snapshot().to_bytes()?;

        if let Some(current) = self.store.get(CANONICAL_KEY)? {
            let tag = Utc::now().format(TIMESTAMP_FORMAT).to_string();
            let existing = self.store.list()?;
            let backup_key = disambiguate_key(&backup_key_for(&tag), &existing);
            self.store.put(&backup_key, &current)?;
            tracing::debug!(backup = %backup_key, "previous snapshot backed up");
        }

        self.store.put(CANONICAL_KEY, &bytes)?;

        for entry in rotation_overflow(&self.list_backups()?, self.max_backups) {
            self.store.delete(&entry.key)?;
            tracing::debug!(backup = %entry.key, "expired backup pruned");
        }

        tracing::info!(hidden_nodes = network.hidden_nodes(), "model snapshot saved");
        Ok(())
    }

    /// Load the canonical snapshot into a fresh network.
    pub fn load(&self) -> Result<Network> {
        let bytes = self
            .store
            .get(CANONICAL_KEY)?
            .ok_or(Error::SnapshotNotFound)?;
        let snapshot = ModelSnapshot::from_bytes(&bytes)?;
        Network::from_snapshot(&snapshot)
    }

    /// All backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        let prefix = backup_key_for("");
        let mut entries: Vec<BackupEntry> = self
            .store
            .list()?
            .into_iter()
            .filter_map(|key| {
                key.strip_prefix(&prefix).map(|tag| BackupEntry {
                    timestamp: tag.to_string(),
                    key: key.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    /// Make backup `index` (0 = newest) the canonical snapshot and load it.
    ///
    /// The backup is copied, not moved: the restored state remains in the
    /// backup list and the next save can back it up again.
    pub fn restore_from_backup(&mut self, index: usize) -> Result<Network> {
        let backups = self.list_backups()?;
        let entry = backups.get(index).ok_or(Error::BackupIndex {
            index,
            available: backups.len(),
        })?;

        let bytes = self
            .store
            .get(&entry.key)?
            .ok_or(Error::SnapshotNotFound)?;
        self.store.put(CANONICAL_KEY, &bytes)?;
        tracing::info!(backup = %entry.key, "snapshot restored from backup");

        self.load()
    }
}

fn backup_key_for(tag: &str) -> String {
    format!("{CANONICAL_KEY}{BACKUP_INFIX}{tag}")
}

/// Resolve a same-timestamp collision by appending `_1`, `_2`, ...
///
/// The numeric suffix sorts after the bare tag, so newest-first ordering
/// by key stays correct for saves within one timestamp granule.
fn disambiguate_key(base: &str, existing: &[String]) -> String {
    if !existing.iter().any(|k| k == base) {
        return base.to_string();
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{base}_{n}");
        if !existing.iter().any(|k| k == &candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Keep-newest-K rotation policy as a pure function.
///
/// `entries` must be sorted newest first; everything past `keep` is
/// returned for deletion, oldest last.
fn rotation_overflow(entries: &[BackupEntry], keep: usize) -> Vec<BackupEntry> {
    if entries.len() <= keep {
        return Vec::new();
    }
    entries[keep..].to_vec()
}
