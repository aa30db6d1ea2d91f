use ndarray::{array, Array1};
use rand::Rng;
use std::collections::VecDeque;

use crate::error::{PendulumError, Result};

/// Names of the six record fields, in storage order.
pub const RECORD_FIELDS: [&str; 6] = ["theta", "omega", "action", "theta_2", "omega_2", "reward"];

/// One transition exactly as it was submitted: the raw text of
/// `[theta, omega, action, theta', omega', reward]`.
///
/// Values are not checked on the way in; they are parsed when a training
/// batch draws the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub fields: [String; 6],
}

impl Record {
    /// Build a record from submitted values, which must number exactly six.
    pub fn from_values(values: Vec<String>) -> Result<Self> {
        let count = values.len();
        let fields: [String; 6] = values
            .try_into()
            .map_err(|_| PendulumError::dimension_mismatch("6 record fields".to_string(), count.to_string()))?;
        Ok(Record { fields })
    }

    /// Parse the raw text into a [`Transition`] for a network with `num_actions` outputs.
    pub fn parse(&self, num_actions: usize) -> Result<Transition> {
        let float = |i: usize| parse_float(RECORD_FIELDS[i], &self.fields[i]);

        let state = array![float(0)?, float(1)?];
        let raw_action = float(2)?;
        let next_state = array![float(3)?, float(4)?];
        let reward = float(5)?;

        let action = raw_action.trunc();
        if !action.is_finite() || action < 0.0 || action >= num_actions as f32 {
            return Err(PendulumError::InvalidAction {
                action: self.fields[2].clone(),
                max_actions: num_actions,
            });
        }

        Ok(Transition {
            state,
            action: action as usize,
            reward,
            next_state,
        })
    }
}

impl From<&Transition> for Record {
    fn from(t: &Transition) -> Self {
        Record {
            fields: [
                t.state[0].to_string(),
                t.state[1].to_string(),
                t.action.to_string(),
                t.next_state[0].to_string(),
                t.next_state[1].to_string(),
                t.reward.to_string(),
            ],
        }
    }
}

/// Parse one submitted value as a float, tolerating surrounding whitespace.
pub fn parse_float(field: &str, value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| PendulumError::invalid_value(field, value))
}

/// A parsed transition used to build Q-learning targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
}

/// Sliding window of the most recent records. Once full, every insert
/// evicts the oldest record.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Record>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, record: Record) {
        if self.capacity == 0 {
            return;
        }
        while self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(record);
    }

    /// Draw `batch_size` records uniformly at random, with replacement.
    pub fn sample<R: Rng>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Record>> {
        if self.buffer.is_empty() {
            return Err(PendulumError::EmptyBuffer("replay buffer holds no records".to_string()));
        }
        Ok((0..batch_size)
            .map(|_| &self.buffer[rng.gen_range(0..self.buffer.len())])
            .collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.buffer.iter()
    }
}
