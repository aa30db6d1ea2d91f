//! # Q-learning agent
//!
//! [`QAgent`] owns everything the service mutates between requests: the
//! model, the replay memory, the exploration noise and the random number
//! generator.
//!
//! - **act**: forward pass, add Gaussian noise, return the index of the
//!   larger Q-value.
//! - **remember**: append a raw transition record to the replay memory.
//! - **train**: for each iteration draw a batch with replacement, replace the
//!   taken action's Q-value with `reward + discount * max(Q(next))`, take one
//!   gradient step; afterwards overwrite the model file.
//!
//! There is no target network: next-state values come from the same model
//! that is being trained.
//!
//! ```rust,no_run
//! use pendulum_q::agent::QAgent;
//! use pendulum_q::config::ServiceConfig;
//! use ndarray::array;
//!
//! let mut agent = QAgent::from_config(&ServiceConfig::default()).unwrap();
//! let action = agent.act(array![1.57, 0.0].view()).unwrap();
//! assert!(action < 2);
//! ```

use log::debug;
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::ServiceConfig;
use crate::error::{PendulumError, Result};
use crate::exploration::{argmax, GaussianNoise};
use crate::model::QModel;
use crate::replay_buffer::{Record, ReplayBuffer, Transition};
use crate::STATE_SIZE;

/// Summary of one `train` call.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainReport {
    /// Gradient steps taken.
    pub iterations: usize,
    /// Records drawn across all iterations.
    pub samples: usize,
    /// Mean loss over the iterations, `None` when no step was taken.
    pub mean_loss: Option<f32>,
}

pub struct QAgent {
    pub model: QModel,
    pub memory: ReplayBuffer,
    pub noise: GaussianNoise,
    pub discount: f32,
    pub batch_size: usize,
    pub learning_rate: f32,
    rng: StdRng,
}

impl QAgent {
    pub fn new(model: QModel, config: &ServiceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        QAgent {
            model,
            memory: ReplayBuffer::new(config.memory_capacity),
            noise: GaussianNoise::new(config.noise_mean, config.noise_std, config.noise_decay),
            discount: config.discount,
            batch_size: config.batch_size,
            learning_rate: config.learning_rate,
            rng,
        }
    }

    /// Validate `config`, load (or initialise) the model it names and build the agent.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let model = QModel::load_or_init(&config.model_path, &config.hidden_layers)?;
        Ok(Self::new(model, config))
    }

    /// Pick an action for `state`: argmax over the noisy Q-values.
    pub fn act(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        if state.len() != STATE_SIZE {
            return Err(PendulumError::dimension_mismatch(
                format!("{} state values", STATE_SIZE),
                format!("{}", state.len()),
            ));
        }
        let q_values = self.model.network.predict(state)?;
        let noise = self.noise.sample(q_values.len(), &mut self.rng);
        let noisy = &q_values + &noise;
        debug!("q={:?} noisy={:?} std={:e}", q_values.to_vec(), noisy.to_vec(), self.noise.std());
        argmax(&noisy).ok_or_else(|| PendulumError::NumericalError("No valid Q-values".to_string()))
    }

    /// Store one raw transition record.
    pub fn remember(&mut self, record: Record) {
        self.memory.add(record);
    }

    /// Run `batches` single-step fits on freshly sampled batches, then save the model.
    pub fn train(&mut self, batches: usize) -> Result<TrainReport> {
        let num_actions = self.model.network.output_size();
        let mut losses = Vec::with_capacity(batches);
        let mut samples = 0;

        for _ in 0..batches {
            let transitions = self
                .memory
                .sample(self.batch_size, &mut self.rng)?
                .into_iter()
                .map(|record| record.parse(num_actions))
                .collect::<Result<Vec<Transition>>>()?;

            let (features, targets) = self.build_targets(&transitions)?;
            let loss = self
                .model
                .network
                .train_minibatch(features.view(), targets.view(), self.learning_rate)?;
            losses.push(loss);
            samples += transitions.len();
        }

        self.model.save()?;

        let mean_loss = if losses.is_empty() {
            None
        } else {
            Some(losses.iter().sum::<f32>() / losses.len() as f32)
        };
        Ok(TrainReport {
            iterations: losses.len(),
            samples,
            mean_loss,
        })
    }

    /// Features are the prior states; targets are the current predictions with the
    /// taken action's value replaced by the one-step bootstrapped return.
    pub(crate) fn build_targets(&self, transitions: &[Transition]) -> Result<(Array2<f32>, Array2<f32>)> {
        let num_actions = self.model.network.output_size();
        let mut features = Array2::zeros((transitions.len(), STATE_SIZE));
        let mut targets = Array2::zeros((transitions.len(), num_actions));

        for (i, t) in transitions.iter().enumerate() {
            let mut q_last = self.model.network.predict(t.state.view())?;
            let q_next = self.model.network.predict(t.next_state.view())?;
            let max_next = q_next.iter().fold(f32::NEG_INFINITY, |max, &val| max.max(val));
            q_last[t.action] = t.reward + self.discount * max_next;

            features.row_mut(i).assign(&t.state);
            targets.row_mut(i).assign(&q_last);
        }
        Ok((features, targets))
    }
}
