use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::activations::Activation;
use crate::error::{PendulumError, Result};
use crate::layers::Layer;
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A Neural Network consisting of multiple layers, an optimizer, and methods for training
/// and making predictions.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<Layer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Create a new neural network with the given layer sizes, activations, and optimizer.
    /// `layer_sizes` holds one more entry than `activations`: the input width followed by
    /// the output width of every layer.
    pub fn new(layer_sizes: &[usize], activations: &[Activation], optimizer: OptimizerWrapper) -> Result<Self> {
        if layer_sizes.len() < 2 || layer_sizes.len() - 1 != activations.len() {
            return Err(PendulumError::dimension_mismatch(
                format!("{} activations", layer_sizes.len().saturating_sub(1)),
                format!("{}", activations.len()),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| Layer::new(window[0], window[1], activation))
            .collect::<Vec<_>>();

        Ok(NeuralNetwork { layers, optimizer })
    }

    /// Width of the input vector.
    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    /// Width of the output vector.
    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.output_size()).unwrap_or(0)
    }

    /// Perform a forward pass for a single input vector.
    pub fn predict(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.predict_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Perform a forward pass for a batch of input vectors, one per row.
    pub fn predict_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input_width(inputs.ncols())?;
        let mut current_output = inputs.to_owned();
        for layer in &self.layers {
            current_output = layer.predict_batch(current_output.view());
        }
        Ok(current_output)
    }

    fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut current_output = inputs.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_batch(current_output.view());
        }
        current_output
    }

    /// Compute gradients for every layer, ordered from the first layer to the last.
    fn backward_batch(&mut self, output_errors: ArrayView2<f32>) -> Result<Vec<(Array2<f32>, Array1<f32>)>> {
        let mut gradients: Vec<(Array2<f32>, Array1<f32>)> = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors.to_owned();

        for i in (0..self.layers.len()).rev() {
            let layer = &self.layers[i];
            let (adjusted_error, weight_gradients, bias_gradients) = layer.backward_batch(current_error.view())?;
            gradients.push((weight_gradients, bias_gradients));

            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        Ok(gradients)
    }

    /// One gradient step on a batch with mean-squared-error loss.
    /// Returns the loss measured before the update.
    pub fn train_minibatch(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        self.check_input_width(inputs.ncols())?;
        if targets.dim() != (inputs.nrows(), self.output_size()) {
            return Err(PendulumError::dimension_mismatch(
                format!("targets of shape ({}, {})", inputs.nrows(), self.output_size()),
                format!("{:?}", targets.dim()),
            ));
        }
        if inputs.nrows() == 0 {
            return Err(PendulumError::EmptyBuffer("no samples in minibatch".to_string()));
        }

        let outputs = self.forward_batch(inputs);
        let diff = &outputs - &targets;
        let loss = diff.mapv(|x| x * x).mean().unwrap_or(f32::INFINITY);
        if !loss.is_finite() {
            // Nothing has been updated yet, so the network stays usable.
            for layer in &mut self.layers {
                layer.clear_cache();
            }
            return Err(PendulumError::NumericalError(format!("non-finite training loss {}", loss)));
        }

        // d(mean((y - t)^2)) / dy
        let output_errors = diff * (2.0 / outputs.len() as f32);
        let gradients = self.backward_batch(output_errors.view())?;

        for (i, (layer, (weight_gradients, bias_gradients))) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(i, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(i, &mut layer.biases, &bias_gradients, learning_rate);
            layer.clear_cache();
        }
        self.optimizer.step();
        Ok(loss)
    }

    fn check_input_width(&self, width: usize) -> Result<()> {
        if width != self.input_size() {
            return Err(PendulumError::dimension_mismatch(
                format!("{} input values", self.input_size()),
                format!("{}", width),
            ));
        }
        Ok(())
    }

    /// Save the neural network's state to a file.
    /// The network, including its layers and optimizer moments, is serialized with bincode
    /// into a sibling temporary file which is then renamed over `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let serialized = bincode::serialize(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Load a neural network from a file written by [`NeuralNetwork::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let buffer = fs::read(path)?;
        let network: Self = bincode::deserialize(&buffer)?;
        Ok(network)
    }
}
