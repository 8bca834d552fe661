//! Network and search configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Number of output classes; one per digit.
pub const OUTPUT_CLASSES: usize = 10;

fn default_input_size() -> usize {
    400
}

fn default_hidden_nodes() -> usize {
    20
}

fn default_learning_rate() -> f64 {
    0.1
}

/// Configuration for a single-hidden-layer network.
///
/// Defaults fit the drawing-canvas demo: a 20x20 pixel grid (400 inputs),
/// 20 hidden nodes, learning rate 0.1. Output width is fixed at
/// [`OUTPUT_CLASSES`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of input pixels per sample
    #[serde(default = "default_input_size")]
    pub input_size: usize,
    /// Hidden layer width
    #[serde(default = "default_hidden_nodes")]
    pub hidden_nodes: usize,
    /// Fixed learning rate for weight updates
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            input_size: default_input_size(),
            hidden_nodes: default_hidden_nodes(),
            learning_rate: default_learning_rate(),
        }
    }
}

impl NetworkConfig {
    /// Set the input width
    pub fn with_input_size(mut self, input_size: usize) -> Self {
        self.input_size = input_size;
        self
    }

    /// Set the hidden layer width
    pub fn with_hidden_nodes(mut self, hidden_nodes: usize) -> Self {
        self.hidden_nodes = hidden_nodes;
        self
    }

    /// Set the learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a usable network
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(Error::InvalidConfig("input_size must be at least 1".into()));
        }
        if self.hidden_nodes == 0 {
            return Err(Error::InvalidConfig(
                "hidden_nodes must be at least 1".into(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(
                "learning_rate must be positive and finite".into(),
            ));
        }
        Ok(())
    }
}

fn default_epochs() -> usize {
    3
}

fn default_eval_trials() -> usize {
    10
}

/// Configuration for the hidden-width search.
///
/// Each candidate width trains for `epochs` full passes and is then scored
/// by averaging `eval_trials` repeated accuracy passes over the test set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Training epochs per candidate
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    /// Repeated evaluation passes per candidate
    #[serde(default = "default_eval_trials")]
    pub eval_trials: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            eval_trials: default_eval_trials(),
        }
    }
}

impl SearchConfig {
    /// Set the per-candidate epoch count
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the number of evaluation passes
    pub fn with_eval_trials(mut self, eval_trials: usize) -> Self {
        self.eval_trials = eval_trials;
        self
    }

    /// Check that the search configuration can make progress
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.eval_trials == 0 {
            return Err(Error::InvalidConfig(
                "eval_trials must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
