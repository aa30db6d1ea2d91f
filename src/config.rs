//! Service configuration.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! { "bind": "0.0.0.0:5000", "model_path": "models/pendulum.bin", "discount": 0.9 }
//! ```

use serde::{Serialize, Deserialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PendulumError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listen address.
    pub bind: String,
    /// Model file, loaded at startup and overwritten after training.
    pub model_path: PathBuf,
    /// Hidden layer widths used when no model file exists yet.
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f32,
    /// Discount applied to the best next-state Q-value.
    pub discount: f32,
    /// Records drawn per training iteration.
    pub batch_size: usize,
    /// Replay buffer capacity.
    pub memory_capacity: usize,
    pub noise_mean: f64,
    pub noise_std: f64,
    /// Fraction of the noise std removed per prediction.
    pub noise_decay: f64,
    /// Fixed RNG seed; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            bind: "127.0.0.1:5000".to_string(),
            model_path: PathBuf::from("model.bin"),
            hidden_layers: vec![24, 24],
            learning_rate: 1e-4,
            discount: 0.8,
            batch_size: 4,
            memory_capacity: 512,
            noise_mean: 0.0,
            noise_std: 1e-6,
            noise_decay: 1e-4,
            seed: None,
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file; missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: ServiceConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(PendulumError::invalid_parameter("discount", "must be within [0, 1]"));
        }
        if self.batch_size == 0 {
            return Err(PendulumError::invalid_parameter("batch_size", "must be positive"));
        }
        if self.memory_capacity == 0 {
            return Err(PendulumError::invalid_parameter("memory_capacity", "must be positive"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(PendulumError::invalid_parameter("learning_rate", "must be a positive number"));
        }
        if !(self.noise_std.is_finite() && self.noise_std >= 0.0) {
            return Err(PendulumError::invalid_parameter("noise_std", "must be a non-negative number"));
        }
        if !self.noise_mean.is_finite() {
            return Err(PendulumError::invalid_parameter("noise_mean", "must be finite"));
        }
        if !(self.noise_decay > 0.0 && self.noise_decay < 1.0) {
            return Err(PendulumError::invalid_parameter("noise_decay", "must be within (0, 1)"));
        }
        if self.hidden_layers.is_empty() || self.hidden_layers.contains(&0) {
            return Err(PendulumError::invalid_parameter("hidden_layers", "needs at least one non-empty layer"));
        }
        Ok(())
    }
}
