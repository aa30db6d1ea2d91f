//! Gaussian exploration noise added to Q-values before picking an action.
//!
//! The standard deviation shrinks by a fixed fraction after every draw and
//! is never reset, so exploration anneals over the lifetime of the process.

use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianNoise {
    pub mean: f64,
    std: f64,
    /// Fraction of the std removed after each draw.
    pub decay: f64,
    draws: u64,
}

impl GaussianNoise {
    pub fn new(mean: f64, std: f64, decay: f64) -> Self {
        GaussianNoise {
            mean,
            std,
            decay,
            draws: 0,
        }
    }

    /// Current standard deviation.
    pub fn std(&self) -> f64 {
        self.std
    }

    /// Number of draws so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Draw `n` independent samples with the current std, then decay the std.
    pub fn sample<R: Rng>(&mut self, n: usize, rng: &mut R) -> Array1<f32> {
        let noise = Array1::from_shape_fn(n, |_| {
            let z: f64 = rng.sample(StandardNormal);
            (self.mean + self.std * z) as f32
        });
        self.decay_std();
        self.draws += 1;
        noise
    }

    fn decay_std(&mut self) {
        if self.std > 0.0 {
            // Floored so the std approaches zero without ever reaching it.
            self.std = (self.std - self.decay * self.std).max(f64::MIN_POSITIVE);
        }
    }
}

impl Default for GaussianNoise {
    fn default() -> Self {
        GaussianNoise::new(0.0, 1e-6, 1e-4)
    }
}

/// Index of the largest value; ties go to the lowest index.
pub fn argmax(values: &Array1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            None => best = Some((i, v)),
            Some((_, b)) if v > b => best = Some((i, v)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}
