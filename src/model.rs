//! The persisted Q-network: a 2-value state in, one Q-value per action out.

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::activations::Activation;
use crate::error::{PendulumError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::{Adam, OptimizerWrapper};
use crate::{NUM_ACTIONS, STATE_SIZE};

/// A network bound to the file it is loaded from and saved to.
#[derive(Debug)]
pub struct QModel {
    pub network: NeuralNetwork,
    path: PathBuf,
}

impl QModel {
    /// A freshly initialised network with ReLU hidden layers and a linear head.
    pub fn fresh<P: Into<PathBuf>>(path: P, hidden_layers: &[usize]) -> Result<Self> {
        let mut layer_sizes = Vec::with_capacity(hidden_layers.len() + 2);
        layer_sizes.push(STATE_SIZE);
        layer_sizes.extend_from_slice(hidden_layers);
        layer_sizes.push(NUM_ACTIONS);

        let mut activations = vec![Activation::Relu; hidden_layers.len()];
        activations.push(Activation::Linear);

        let optimizer = OptimizerWrapper::Adam(Adam::keras_defaults());
        let network = NeuralNetwork::new(&layer_sizes, &activations, optimizer)?;
        Ok(QModel { network, path: path.into() })
    }

    /// Load the model stored at `path`.
    pub fn load<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let network = NeuralNetwork::load(&path)?;
        Self::from_network(network, path)
    }

    /// Load the model at `path`, or start a fresh one when no file exists yet.
    pub fn load_or_init<P: Into<PathBuf>>(path: P, hidden_layers: &[usize]) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            let model = Self::load(&path)?;
            info!("loaded model from {}", path.display());
            Ok(model)
        } else {
            warn!("no model at {}, initialising a fresh network", path.display());
            Self::fresh(path, hidden_layers)
        }
    }

    /// Wrap an existing network, checking it maps 2 state values to 2 actions.
    pub fn from_network<P: Into<PathBuf>>(network: NeuralNetwork, path: P) -> Result<Self> {
        if network.input_size() != STATE_SIZE || network.output_size() != NUM_ACTIONS {
            return Err(PendulumError::dimension_mismatch(
                format!("{} -> {}", STATE_SIZE, NUM_ACTIONS),
                format!("{} -> {}", network.input_size(), network.output_size()),
            ));
        }
        Ok(QModel { network, path: path.into() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the model file with the current weights.
    pub fn save(&self) -> Result<()> {
        self.network.save(&self.path)?;
        info!("saved model to {}", self.path.display());
        Ok(())
    }
}
