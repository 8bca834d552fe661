//! Batch training driver
//!
//! A `Trainer` owns exactly one network and applies labeled samples to it
//! sequentially. Sample order matters: learning is stateful, so the same
//! batch in a different order produces different weights. Each epoch
//! replays the batch in the same given order.

use crate::data::{validate_batch, Sample};
use crate::error::Result;
use crate::nn::network::Network;

/// Drives training and prediction against one owned [`Network`].
///
/// Persistence is explicit: nothing here touches storage. Callers hand the
/// network to a `SnapshotManager` when they want it saved.
pub struct Trainer {
    network: Network,
    epochs: usize,
}

impl Trainer {
    /// Wrap a network with a single-epoch trainer
    pub fn new(network: Network) -> Self {
        Self { network, epochs: 1 }
    }

    /// Set how many times `train` replays the whole batch
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Epochs per `train` call
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// The owned network
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutable access to the owned network
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Give up the trainer and keep the network
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Train on every sample, in the given order, for the configured
    /// number of epochs.
    ///
    /// The whole batch is validated before the first weight update, so a
    /// bad sample anywhere in the batch leaves the network untouched.
    pub fn train(&mut self, samples: &[Sample]) -> Result<()> {
        validate_batch(samples, self.network.input_size())?;

        for epoch in 0..self.epochs {
            for sample in samples {
                self.network.train_one(&sample.pixels, sample.label)?;
            }
            tracing::debug!(epoch, samples = samples.len(), "epoch complete");
        }
        Ok(())
    }

    /// Predict the digit for one pixel vector
    pub fn predict(&self, pixels: &[f64]) -> Result<u8> {
        self.network.predict(pixels)
    }

    /// Fraction of `samples` the network currently classifies correctly.
    ///
    /// An empty slice scores 0.0.
    pub fn accuracy(&self, samples: &[Sample]) -> Result<f64> {
        if samples.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for sample in samples {
            if self.predict(&sample.pixels)? == sample.label {
                correct += 1;
            }
        }
        Ok(correct as f64 / samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::error::Error;

    fn trainer_for(input_size: usize) -> Trainer {
        let config = NetworkConfig::default()
            .with_input_size(input_size)
            .with_hidden_nodes(6);
        Trainer::new(Network::new(&config).unwrap())
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let mut trainer = trainer_for(4);
        assert!(matches!(
            trainer.train(&[]).unwrap_err(),
            Error::EmptyTrainingSet
        ));
    }

    #[test]
    fn test_bad_sample_rejected_before_training() {
        let mut trainer = trainer_for(4);
        let before = trainer.network().snapshot();

        let batch = vec![
            Sample::new(vec![0.1; 4], 1),
            Sample::new(vec![0.2; 3], 2), // wrong width
        ];
        let err = trainer.train(&batch).unwrap_err();
        assert!(matches!(err, Error::InvalidSample { index: 1, .. }));

        // Validation failed up front, so no weight was touched.
        assert_eq!(trainer.network().snapshot(), before);
    }

    #[test]
    fn test_predict_returns_digit() {
        let trainer = trainer_for(4);
        let label = trainer.predict(&[0.3, 0.1, 0.7, 0.5]).unwrap();
        assert!(label <= 9);
    }

    #[test]
    fn test_single_sample_convergence() {
        let mut trainer = trainer_for(4).with_epochs(50);
        let sample = Sample::new(vec![0.9, 0.2, 0.7, 0.1], 4);

        trainer.train(std::slice::from_ref(&sample)).unwrap();

        assert_eq!(trainer.predict(&sample.pixels).unwrap(), 4);
        assert_eq!(trainer.accuracy(std::slice::from_ref(&sample)).unwrap(), 1.0);
    }

    #[test]
    fn test_accuracy_on_empty_slice() {
        let trainer = trainer_for(4);
        assert_eq!(trainer.accuracy(&[]).unwrap(), 0.0);
    }
}
