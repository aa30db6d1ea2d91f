//! Episode runner: swings the pendulum with a controller and, when connected
//! to a service, streams every transition to it.

use log::{debug, info};
use ndarray::array;
use rand::Rng;
use std::f64::consts::PI;

use crate::client::ServiceClient;
use crate::error::Result;
use crate::pendulum::{flip_for_omega, rule_based_action, sparse_reward, Pendulum, PendulumParams};
use crate::replay_buffer::Transition;

/// Where actions come from.
#[derive(Clone, Debug)]
pub enum Controller {
    /// The local swing-up heuristic.
    RuleBased,
    /// The service's Q-network; its answer is an energy action.
    Network(ServiceClient),
}

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub params: PendulumParams,
    pub runs: usize,
    pub iterations_per_run: usize,
    pub initial_theta: f64,
    /// Start every run at a random angle in [0, pi) instead of `initial_theta`.
    pub random_start: bool,
    /// Request one training iteration after each transition.
    pub train: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            params: PendulumParams::default(),
            runs: 1,
            iterations_per_run: 200,
            initial_theta: PI / 2.0,
            random_start: false,
            train: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EpisodeSummary {
    pub transitions: Vec<Transition>,
    pub total_reward: f64,
}

impl EpisodeSummary {
    /// Fraction of decisions that ended upright.
    pub fn upright_fraction(&self) -> f64 {
        if self.transitions.is_empty() {
            return 0.0;
        }
        self.transitions.iter().filter(|t| t.reward > 0.0).count() as f64 / self.transitions.len() as f64
    }
}

pub struct Simulation {
    pub config: SimulationConfig,
    controller: Controller,
    sink: Option<ServiceClient>,
}

impl Simulation {
    /// `sink`, when set, receives every transition (and training requests when
    /// `config.train` is on).
    pub fn new(config: SimulationConfig, controller: Controller, sink: Option<ServiceClient>) -> Self {
        Simulation { config, controller, sink }
    }

    async fn choose(&self, pendulum: &Pendulum) -> Result<usize> {
        match &self.controller {
            Controller::RuleBased => Ok(rule_based_action(&self.config.params, pendulum.theta, pendulum.omega)),
            Controller::Network(client) => {
                let energy_action = client.predict(pendulum.theta, pendulum.omega).await?;
                Ok(flip_for_omega(energy_action, pendulum.omega))
            }
        }
    }

    /// Run one episode from `start`.
    pub async fn run_episode(&self, start: Pendulum) -> Result<EpisodeSummary> {
        let params = &self.config.params;
        let mut pendulum = start;
        let mut summary = EpisodeSummary::default();

        for step in 0..self.config.iterations_per_run {
            let before = pendulum;
            let torque_action = self.choose(&pendulum).await?;
            pendulum.advance(params, torque_action);
            pendulum.fold();

            let reward = sparse_reward(pendulum.theta);
            let transition = Transition {
                state: array![before.theta as f32, before.omega as f32],
                action: flip_for_omega(torque_action, before.omega),
                reward: reward as f32,
                next_state: array![pendulum.theta as f32, pendulum.omega as f32],
            };

            if let Some(sink) = &self.sink {
                sink.save(&transition).await?;
                if self.config.train {
                    sink.train(1).await?;
                }
            }

            debug!("step {} theta={:.4} action={}", step, pendulum.theta, transition.action);
            summary.total_reward += reward;
            summary.transitions.push(transition);
        }
        Ok(summary)
    }

    /// Run every configured episode.
    pub async fn run(&self) -> Result<Vec<EpisodeSummary>> {
        let mut summaries = Vec::with_capacity(self.config.runs);
        for run in 0..self.config.runs {
            let theta = if self.config.random_start {
                rand::thread_rng().gen_range(0.0..PI)
            } else {
                self.config.initial_theta
            };
            let summary = self.run_episode(Pendulum::new(theta, 0.0)).await?;
            info!(
                "run {} done: reward {:.1}, upright {:.1}%",
                run,
                summary.total_reward,
                100.0 * summary.upright_fraction()
            );
            summaries.push(summary);
        }
        Ok(summaries)
    }
}
