//! Self-describing model snapshot
//!
//! A snapshot records the hidden-layer width alongside the four parameter
//! tensors, so a loader can reconstruct every dimension without external
//! metadata.

use serde::{Deserialize, Serialize};

use crate::config::OUTPUT_CLASSES;
use crate::error::{Error, Result};

/// Serialized network parameters plus their dimensions.
///
/// Matrices are stored as rows of `f64`; the JSON encoding is plain nested
/// arrays, readable by anything that speaks JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Input width the network was sized for
    pub input_size: usize,
    /// Hidden layer width
    pub hidden_nodes: usize,
    /// (input_size, hidden_nodes) weight rows
    pub input_to_hidden: Vec<Vec<f64>>,
    /// (hidden_nodes, 10) weight rows
    pub hidden_to_output: Vec<Vec<f64>>,
    /// Length hidden_nodes
    pub input_bias: Vec<f64>,
    /// Length 10
    pub hidden_bias: Vec<f64>,
}

impl ModelSnapshot {
    /// Decode a snapshot from JSON bytes and validate it
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_slice(bytes).map_err(|e| Error::CorruptSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Encode the snapshot as JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Check dimensional consistency and that every value is finite
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_nodes == 0 {
            return Err(Error::CorruptSnapshot(
                "zero-sized layer dimensions".into(),
            ));
        }
        if self.input_to_hidden.len() != self.input_size {
            return Err(Error::CorruptSnapshot(format!(
                "input_to_hidden has {} rows, expected {}",
                self.input_to_hidden.len(),
                self.input_size
            )));
        }
        if self
            .input_to_hidden
            .iter()
            .any(|row| row.len() != self.hidden_nodes)
        {
            return Err(Error::CorruptSnapshot(format!(
                "input_to_hidden row width differs from hidden_nodes {}",
                self.hidden_nodes
            )));
        }
        if self.hidden_to_output.len() != self.hidden_nodes {
            return Err(Error::CorruptSnapshot(format!(
                "hidden_to_output has {} rows, expected {}",
                self.hidden_to_output.len(),
                self.hidden_nodes
            )));
        }
        if self
            .hidden_to_output
            .iter()
            .any(|row| row.len() != OUTPUT_CLASSES)
        {
            return Err(Error::CorruptSnapshot(format!(
                "hidden_to_output row width differs from {OUTPUT_CLASSES}"
            )));
        }
        if self.input_bias.len() != self.hidden_nodes {
            return Err(Error::CorruptSnapshot(format!(
                "input_bias has length {}, expected {}",
                self.input_bias.len(),
                self.hidden_nodes
            )));
        }
        if self.hidden_bias.len() != OUTPUT_CLASSES {
            return Err(Error::CorruptSnapshot(format!(
                "hidden_bias has length {}, expected {OUTPUT_CLASSES}",
                self.hidden_bias.len()
            )));
        }

        let all_finite = self
            .input_to_hidden
            .iter()
            .chain(self.hidden_to_output.iter())
            .flatten()
            .chain(self.input_bias.iter())
            .chain(self.hidden_bias.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::CorruptSnapshot("non-finite parameter value".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(input: usize, hidden: usize) -> ModelSnapshot {
        ModelSnapshot {
            input_size: input,
            hidden_nodes: hidden,
            input_to_hidden: vec![vec![0.01; hidden]; input],
            hidden_to_output: vec![vec![0.02; OUTPUT_CLASSES]; hidden],
            input_bias: vec![0.0; hidden],
            hidden_bias: vec![0.0; OUTPUT_CLASSES],
        }
    }

    #[test]
    fn test_valid_snapshot_roundtrip() {
        let snap = snapshot(4, 3);
        let bytes = snap.to_bytes().unwrap();
        let decoded = ModelSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, snap);
    }

    #[test]
    fn test_dimension_mismatch_is_corrupt() {
        let mut snap = snapshot(4, 3);
        snap.input_to_hidden.pop();
        assert!(matches!(
            snap.validate().unwrap_err(),
            Error::CorruptSnapshot(_)
        ));

        let mut snap = snapshot(4, 3);
        snap.hidden_bias.push(0.5);
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_non_finite_value_is_corrupt() {
        let mut snap = snapshot(2, 2);
        snap.hidden_to_output[1][4] = f64::NAN;
        assert!(snap.validate().is_err());

        let mut snap = snapshot(2, 2);
        snap.input_bias[0] = f64::INFINITY;
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_garbage_bytes_are_corrupt() {
        assert!(matches!(
            ModelSnapshot::from_bytes(b"not json").unwrap_err(),
            Error::CorruptSnapshot(_)
        ));
    }
}
