use ndarray::{Array, Array1, Array2, Dimension, Zip};
use serde::{Serialize, Deserialize};

/// Parameter update rule applied layer by layer after backpropagation.
///
/// `layer` is the index of the layer inside its network, so stateful
/// optimizers can keep one set of moments per layer.
pub trait Optimizer {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);

    /// Called once per minibatch after every layer has been updated.
    fn step(&mut self) {}
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }

    fn step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.step(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with bias-corrected first and second moments.
///
/// Moment buffers are allocated lazily the first time a layer index is seen,
/// so the optimizer can be built before the network it trains.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 1,
        }
    }

    /// Keras Adam defaults: beta1 0.9, beta2 0.999, epsilon 1e-7.
    pub fn keras_defaults() -> Self {
        Self::new(0.9, 0.999, 1e-7)
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::keras_defaults()
    }
}

fn ensure_slot<D: Dimension>(slots: &mut Vec<Array<f32, D>>, layer: usize, dim: D) {
    while slots.len() <= layer {
        slots.push(Array::zeros(D::zeros(dim.ndim())));
    }
    if slots[layer].raw_dim() != dim {
        slots[layer] = Array::zeros(dim);
    }
}

#[allow(clippy::too_many_arguments)]
fn adam_update<D: Dimension>(
    param: &mut Array<f32, D>,
    gradients: &Array<f32, D>,
    m: &mut Array<f32, D>,
    v: &mut Array<f32, D>,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: i32,
    learning_rate: f32,
) {
    let m_correction = 1.0 - beta1.powi(t);
    let v_correction = 1.0 - beta2.powi(t);
    Zip::from(param)
        .and(gradients)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            *m = beta1 * *m + (1.0 - beta1) * g;
            *v = beta2 * *v + (1.0 - beta2) * g * g;
            let m_hat = *m / m_correction;
            let v_hat = *v / v_correction;
            *p -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
        });
}

impl Optimizer for Adam {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let dim = weights.raw_dim();
        ensure_slot(&mut self.m_weights, layer, dim.clone());
        ensure_slot(&mut self.v_weights, layer, dim);
        adam_update(
            weights,
            gradients,
            &mut self.m_weights[layer],
            &mut self.v_weights[layer],
            self.beta1,
            self.beta2,
            self.epsilon,
            self.t,
            learning_rate,
        );
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let dim = biases.raw_dim();
        ensure_slot(&mut self.m_biases, layer, dim.clone());
        ensure_slot(&mut self.v_biases, layer, dim);
        adam_update(
            biases,
            gradients,
            &mut self.m_biases[layer],
            &mut self.v_biases[layer],
            self.beta1,
            self.beta2,
            self.epsilon,
            self.t,
            learning_rate,
        );
    }

    fn step(&mut self) {
        self.t = self.t.saturating_add(1);
    }
}
