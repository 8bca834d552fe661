//! # Digit OCR Engine
//!
//! This library implements the learning engine behind a digit-recognition
//! demo: a single-hidden-layer feedforward network trained with
//! backpropagation, snapshot persistence with rotating timestamped backups,
//! and an empirical search for a good hidden-layer width.
//!
//! ## Modules
//!
//! - `nn` - Network implementation (clipped sigmoid, forward pass, backprop)
//! - `trainer` - Batch/epoch training driver owning one network
//! - `storage` - Blob store abstraction, model snapshots, backup rotation
//! - `tuning` - Hidden-node-count search over a train/test split
//! - `data` - Labeled pixel samples and validation
//! - `config` - Network and search configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use digit_ocr::prelude::*;
//!
//! fn main() -> digit_ocr::Result<()> {
//!     let config = NetworkConfig::default().with_hidden_nodes(20);
//!     let mut trainer = Trainer::new(Network::new(&config)?);
//!
//!     let samples = load_samples("digits.json")?;
//!     trainer.train(&samples)?;
//!     let label = trainer.predict(&samples[0].pixels)?;
//!
//!     let mut manager = SnapshotManager::new(DiskStore::open("model_store")?, 5);
//!     manager.save(trainer.network())?;
//!     println!("predicted {label}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod nn;
pub mod storage;
pub mod trainer;
pub mod tuning;

pub use config::{NetworkConfig, SearchConfig};
pub use data::{load_samples, Sample};
pub use error::{Error, Result};
pub use nn::network::Network;
pub use storage::manager::{BackupEntry, SnapshotManager};
pub use storage::snapshot::ModelSnapshot;
pub use storage::{BlobStore, DiskStore, MemoryStore};
pub use trainer::Trainer;
pub use tuning::{search, Candidate, SearchOutcome};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{NetworkConfig, SearchConfig};
    pub use crate::data::{load_samples, Sample};
    pub use crate::error::{Error, Result};
    pub use crate::nn::network::Network;
    pub use crate::storage::manager::{BackupEntry, SnapshotManager};
    pub use crate::storage::snapshot::ModelSnapshot;
    pub use crate::storage::{BlobStore, DiskStore, MemoryStore};
    pub use crate::trainer::Trainer;
    pub use crate::tuning::{search, Candidate, SearchOutcome};
}
