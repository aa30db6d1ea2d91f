//! # Activation Functions Module
//!
//! Element-wise non-linearities applied after each dense layer of the
//! Q-network.
//!
//! ## Available Activations
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Linear**: identity, used on the Q-value output layer
//! - **Tanh**: hyperbolic tangent, outputs between -1 and 1
//!
//! ## Usage Example
//!
//! ```rust
//! use pendulum_q::activations::Activation;
//! use ndarray::arr2;
//!
//! let mut data = arr2(&[[1.0, -0.5], [0.0, 2.0]]);
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, arr2(&[[1.0, 0.0], [0.0, 2.0]]));
//! ```

pub mod functions;

pub use functions::Activation;
