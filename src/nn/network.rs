//! Single-hidden-layer feedforward network
//!
//! Holds the four parameter tensors and implements the forward pass and a
//! single backpropagation step. The tensors are exclusively owned by one
//! `Network` instance; training mutates them in place.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use super::activation::{sigmoid, sigmoid_prime};
use crate::config::{NetworkConfig, OUTPUT_CLASSES};
use crate::error::{Error, Result};
use crate::storage::snapshot::ModelSnapshot;

/// Half-width of the uniform weight initialization range
const INIT_RANGE: f64 = 0.06;

/// Feedforward network with one hidden layer and sigmoid activations.
///
/// Weight layout:
/// - `input_to_hidden`: (input_size, hidden_nodes)
/// - `hidden_to_output`: (hidden_nodes, 10)
/// - `input_bias`: hidden_nodes
/// - `hidden_bias`: 10
#[derive(Debug)]
pub struct Network {
    input_size: usize,
    hidden_nodes: usize,
    learning_rate: f64,
    input_to_hidden: Array2<f64>,
    hidden_to_output: Array2<f64>,
    input_bias: Array1<f64>,
    hidden_bias: Array1<f64>,
}

impl Network {
    /// Create a network with freshly randomized weights.
    ///
    /// All four tensors are drawn uniformly from [-0.06, 0.06).
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        config.validate()?;

        let dist = Uniform::new(-INIT_RANGE, INIT_RANGE);
        Ok(Self {
            input_size: config.input_size,
            hidden_nodes: config.hidden_nodes,
            learning_rate: config.learning_rate,
            input_to_hidden: Array2::random((config.input_size, config.hidden_nodes), dist),
            hidden_to_output: Array2::random((config.hidden_nodes, OUTPUT_CLASSES), dist),
            input_bias: Array1::random(config.hidden_nodes, dist),
            hidden_bias: Array1::random(OUTPUT_CLASSES, dist),
        })
    }

    /// Input width this network was sized for
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Hidden layer width
    pub fn hidden_nodes(&self) -> usize {
        self.hidden_nodes
    }

    /// Learning rate applied by `train_one`
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn check_input(&self, pixels: &[f64]) -> Result<()> {
        if pixels.len() != self.input_size {
            return Err(Error::Shape {
                expected: self.input_size,
                actual: pixels.len(),
            });
        }
        Ok(())
    }

    /// Forward pass with the hidden pre-activation kept for backprop.
    fn propagate(&self, x: ArrayView1<'_, f64>) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
        let hidden_sum = x.dot(&self.input_to_hidden) + &self.input_bias;
        let hidden = hidden_sum.mapv(sigmoid);
        let output_sum = hidden.dot(&self.hidden_to_output) + &self.hidden_bias;
        let output = output_sum.mapv(sigmoid);
        (hidden_sum, hidden, output)
    }

    /// Compute the 10 output activations for one pixel vector.
    ///
    /// Every activation lies strictly inside (0, 1) regardless of input
    /// magnitude; the clipped sigmoid guarantees it.
    pub fn forward(&self, pixels: &[f64]) -> Result<Array1<f64>> {
        self.check_input(pixels)?;
        let (_, _, output) = self.propagate(ArrayView1::from(pixels));
        Ok(output)
    }

    /// Predicted digit: index of the maximum output activation.
    ///
    /// Ties go to the first occurrence.
    pub fn predict(&self, pixels: &[f64]) -> Result<u8> {
        let output = self.forward(pixels)?;
        let mut best = 0usize;
        let mut best_value = output[0];
        for (i, &value) in output.iter().enumerate().skip(1) {
            if value > best_value {
                best = i;
                best_value = value;
            }
        }
        Ok(best as u8)
    }

    /// Apply one backpropagation step for a single labeled sample.
    ///
    /// Builds a one-hot target, takes `target - output` as the output
    /// error, attributes it back through `hidden_to_output` with the
    /// sigmoid derivative, and nudges all four tensors by
    /// `learning_rate * error * source_activation` (biases without the
    /// source factor).
    pub fn train_one(&mut self, pixels: &[f64], label: u8) -> Result<()> {
        self.check_input(pixels)?;
        // Label range is validated by the trainer; an out-of-range value
        // here would index outside the target tensor.
        if usize::from(label) >= OUTPUT_CLASSES {
            return Err(Error::Shape {
                expected: OUTPUT_CLASSES,
                actual: usize::from(label),
            });
        }

        let x = ArrayView1::from(pixels);
        let (hidden_sum, hidden, output) = self.propagate(x);

        let mut target = Array1::<f64>::zeros(OUTPUT_CLASSES);
        target[usize::from(label)] = 1.0;

        let output_error = &target - &output;
        let hidden_error = self.hidden_to_output.dot(&output_error) * hidden_sum.mapv(sigmoid_prime);

        let input_grad = x
            .insert_axis(Axis(1))
            .dot(&hidden_error.view().insert_axis(Axis(0)));
        let output_grad = hidden
            .view()
            .insert_axis(Axis(1))
            .dot(&output_error.view().insert_axis(Axis(0)));

        self.input_to_hidden.scaled_add(self.learning_rate, &input_grad);
        self.hidden_to_output.scaled_add(self.learning_rate, &output_grad);
        self.input_bias.scaled_add(self.learning_rate, &hidden_error);
        self.hidden_bias.scaled_add(self.learning_rate, &output_error);

        Ok(())
    }

    /// Export the parameters as a self-describing snapshot
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            input_size: self.input_size,
            hidden_nodes: self.hidden_nodes,
            input_to_hidden: self
                .input_to_hidden
                .outer_iter()
                .map(|row| row.to_vec())
                .collect(),
            hidden_to_output: self
                .hidden_to_output
                .outer_iter()
                .map(|row| row.to_vec())
                .collect(),
            input_bias: self.input_bias.to_vec(),
            hidden_bias: self.hidden_bias.to_vec(),
        }
    }

    /// Rebuild a network from a validated snapshot.
    ///
    /// The snapshot carries its own dimensions; the learning rate is not
    /// part of the persisted state and comes back as the default.
    pub fn from_snapshot(snapshot: &ModelSnapshot) -> Result<Self> {
        snapshot.validate()?;

        let input_to_hidden = Array2::from_shape_vec(
            (snapshot.input_size, snapshot.hidden_nodes),
            snapshot.input_to_hidden.concat(),
        )
        .map_err(|e| Error::CorruptSnapshot(e.to_string()))?;
        let hidden_to_output = Array2::from_shape_vec(
            (snapshot.hidden_nodes, OUTPUT_CLASSES),
            snapshot.hidden_to_output.concat(),
        )
        .map_err(|e| Error::CorruptSnapshot(e.to_string()))?;

        Ok(Self {
            input_size: snapshot.input_size,
            hidden_nodes: snapshot.hidden_nodes,
            learning_rate: NetworkConfig::default().learning_rate,
            input_to_hidden,
            hidden_to_output,
            input_bias: Array1::from_vec(snapshot.input_bias.clone()),
            hidden_bias: Array1::from_vec(snapshot.hidden_bias.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> NetworkConfig {
        NetworkConfig::default()
            .with_input_size(4)
            .with_hidden_nodes(6)
    }

    #[test]
    fn test_creation_dimensions() {
        let network = Network::new(&small_config()).unwrap();
        assert_eq!(network.input_to_hidden.dim(), (4, 6));
        assert_eq!(network.hidden_to_output.dim(), (6, OUTPUT_CLASSES));
        assert_eq!(network.input_bias.len(), 6);
        assert_eq!(network.hidden_bias.len(), OUTPUT_CLASSES);
    }

    #[test]
    fn test_initial_weights_within_range() {
        let network = Network::new(&small_config()).unwrap();
        for &w in network.input_to_hidden.iter() {
            assert!(w.abs() <= INIT_RANGE);
        }
        for &w in network.hidden_to_output.iter() {
            assert!(w.abs() <= INIT_RANGE);
        }
    }

    #[test]
    fn test_forward_output_shape_and_bounds() {
        let network = Network::new(&small_config()).unwrap();
        let output = network.forward(&[0.1, 0.9, 0.0, 1.0]).unwrap();
        assert_eq!(output.len(), OUTPUT_CLASSES);
        for &v in output.iter() {
            assert!(v > 0.0 && v < 1.0);
        }
    }

    #[test]
    fn test_forward_rejects_wrong_width() {
        let network = Network::new(&small_config()).unwrap();
        let err = network.forward(&[0.5; 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_train_one_moves_weights() {
        let mut network = Network::new(&small_config()).unwrap();
        let before = network.input_to_hidden.clone();
        network.train_one(&[0.2, 0.4, 0.6, 0.8], 3).unwrap();
        assert_ne!(before, network.input_to_hidden);
    }

    #[test]
    fn test_train_one_rejects_out_of_range_label() {
        let mut network = Network::new(&small_config()).unwrap();
        assert!(network.train_one(&[0.5; 4], 10).is_err());
    }

    #[test]
    fn test_train_one_raises_true_label_activation() {
        let mut network = Network::new(&small_config()).unwrap();
        let pixels = [0.9, 0.1, 0.8, 0.2];
        let before = network.forward(&pixels).unwrap()[7];
        for _ in 0..20 {
            network.train_one(&pixels, 7).unwrap();
        }
        let after = network.forward(&pixels).unwrap()[7];
        assert!(after > before, "activation did not move toward target");
    }

    #[test]
    fn test_snapshot_roundtrip_is_exact() {
        let mut network = Network::new(&small_config()).unwrap();
        network.train_one(&[0.2, 0.4, 0.6, 0.8], 5).unwrap();

        let restored = Network::from_snapshot(&network.snapshot()).unwrap();
        assert_eq!(network.input_to_hidden, restored.input_to_hidden);
        assert_eq!(network.hidden_to_output, restored.hidden_to_output);
        assert_eq!(network.input_bias, restored.input_bias);
        assert_eq!(network.hidden_bias, restored.hidden_bias);
    }
}
