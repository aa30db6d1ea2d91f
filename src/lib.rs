//! # pendulum-q - Q-learning microservice for an inverted pendulum
//!
//! pendulum-q hosts a small Q-network behind four HTTP endpoints so that a
//! pendulum simulation can ask for actions, stream back transitions and
//! trigger experience-replay updates. It also ships the simulator that
//! drives it.
//!
//! ## Endpoints
//!
//! - `POST /predict` - `theta`, `omega` in; `0` or `1` out
//! - `POST /save` - one `[theta, omega, action, theta', omega', reward]` record in
//! - `POST /train` - number of mini-batch updates in, model saved afterwards
//! - `POST /debug` - accepted and ignored
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pendulum_q::agent::QAgent;
//! use pendulum_q::config::ServiceConfig;
//! use pendulum_q::replay_buffer::Record;
//!
//! let mut agent = QAgent::from_config(&ServiceConfig::default()).unwrap();
//! let record = Record::from_values(
//!     ["1.57", "0", "1", "1.6", "0.3", "0"].iter().map(|s| s.to_string()).collect(),
//! ).unwrap();
//! agent.remember(record);
//! let report = agent.train(1).unwrap();
//! assert_eq!(report.iterations, 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (ReLU, Linear, Tanh)
//! - [`agent`] - The Q-learning agent shared by the HTTP handlers
//! - [`client`] - HTTP client for a running service
//! - [`config`] - Service configuration
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Decaying Gaussian exploration noise
//! - [`layers`] - Dense layers
//! - [`model`] - The persisted Q-network
//! - [`network`] - Core neural network implementation
//! - [`optimizer`] - SGD and Adam
//! - [`pendulum`] - Pendulum dynamics, rewards and the rule-based controller
//! - [`replay_buffer`] - Raw transition records and the sliding-window memory
//! - [`server`] - axum router and handlers
//! - [`simulate`] - Episode runner driving the pendulum

pub mod activations;
pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod exploration;
pub mod layers;
pub mod model;
pub mod network;
pub mod optimizer;
pub mod pendulum;
pub mod replay_buffer;
pub mod server;
pub mod simulate;

/// Values describing a pendulum state: angle and angular velocity.
pub const STATE_SIZE: usize = 2;

/// Number of discrete actions, one Q-value each.
pub const NUM_ACTIONS: usize = 2;

#[cfg(test)]
mod tests;
