//! Error types for the digit OCR engine

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// A sample failed validation before reaching the network
    #[error("invalid sample at index {index}: {reason}")]
    InvalidSample { index: usize, reason: String },

    /// Training was requested with no samples
    #[error("training sample set is empty")]
    EmptyTrainingSet,

    /// Hidden-width search was given unusable bounds or inputs
    #[error("invalid search: {0}")]
    InvalidSearch(String),

    /// A configuration value describes an unusable network or search
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal tensor dimension mismatch; fatal to the current operation
    #[error("shape mismatch: expected {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    /// No canonical snapshot exists in the store
    #[error("no model snapshot found")]
    SnapshotNotFound,

    /// Snapshot exists but its contents cannot be trusted
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Backup index beyond the available backups
    #[error("backup index {index} out of range ({available} available)")]
    BackupIndex { index: usize, available: usize },

    /// IO error from the underlying store
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
