//! Labeled pixel samples and validation

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::config::OUTPUT_CLASSES;
use crate::error::{Error, Result};

/// One labeled drawing: a flattened pixel grid and the digit it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Flattened pixel intensities in [0, 1], row-major
    pub pixels: Vec<f64>,
    /// Digit label, 0 through 9
    pub label: u8,
}

impl Sample {
    /// Create a new sample
    pub fn new(pixels: Vec<f64>, label: u8) -> Self {
        Self { pixels, label }
    }

    /// Check this sample against the network's input width.
    ///
    /// `index` is reported in the error so callers can point at the
    /// offending element of a batch.
    pub fn validate(&self, input_size: usize, index: usize) -> Result<()> {
        if self.pixels.len() != input_size {
            return Err(Error::InvalidSample {
                index,
                reason: format!("expected {} pixels, got {}", input_size, self.pixels.len()),
            });
        }
        if usize::from(self.label) >= OUTPUT_CLASSES {
            return Err(Error::InvalidSample {
                index,
                reason: format!("label must be 0-9, got {}", self.label),
            });
        }
        if let Some(pos) = self.pixels.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidSample {
                index,
                reason: format!("non-finite pixel value at position {pos}"),
            });
        }
        Ok(())
    }
}

/// Validate a whole batch before any of it reaches the network.
///
/// An empty batch is rejected outright; otherwise every sample is checked
/// in order and the first failure is returned with its index.
pub fn validate_batch(samples: &[Sample], input_size: usize) -> Result<()> {
    if samples.is_empty() {
        return Err(Error::EmptyTrainingSet);
    }
    for (index, sample) in samples.iter().enumerate() {
        sample.validate(input_size, index)?;
    }
    Ok(())
}

/// Load samples from a JSON file: an array of `{"pixels": [...], "label": n}`.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let samples = serde_json::from_reader(reader)?;
    Ok(samples)
}

/// Save samples to a JSON file
pub fn save_samples<P: AsRef<Path>>(samples: &[Sample], path: P) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, samples)?;
    Ok(())
}
