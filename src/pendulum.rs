//! Damped, driven pendulum used to generate transitions for the service.
//!
//! Theta is measured from the upright position, so `theta = 0` is the
//! balanced state and gravity pushes the bob away from it.

use std::f64::consts::PI;

/// Torque direction: 1 is a positive torque, 0 a negative one.
pub type TorqueAction = usize;

/// Energy action: 1 pushes along the angular velocity, 0 against it.
pub type EnergyAction = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct PendulumParams {
    pub mass: f64,
    pub length: f64,
    pub drag: f64,
    pub gravity: f64,
    pub max_applied_torque: f64,
    /// Integration step in seconds.
    pub time_step: f64,
    /// Integration steps between two decisions.
    pub substeps: usize,
}

impl Default for PendulumParams {
    fn default() -> Self {
        PendulumParams {
            mass: 0.8,
            length: 1.0,
            drag: 0.01,
            gravity: 5.0,
            max_applied_torque: 3.0,
            time_step: 0.01,
            substeps: 10,
        }
    }
}

impl PendulumParams {
    pub fn moment(&self) -> f64 {
        self.mass * self.length * self.length
    }

    /// Gravitational torque at `theta`.
    pub fn gravity_torque(&self, theta: f64) -> f64 {
        self.gravity * self.mass * self.length * theta.sin()
    }

    /// Applied torque for a torque-direction action.
    pub fn torque_for(&self, action: TorqueAction) -> f64 {
        if action == 1 {
            self.max_applied_torque
        } else {
            -self.max_applied_torque
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pendulum {
    pub theta: f64,
    pub omega: f64,
}

impl Pendulum {
    pub fn new(theta: f64, omega: f64) -> Self {
        Pendulum { theta, omega }
    }

    fn omega_delta(params: &PendulumParams, theta: f64, omega: f64, torque: f64) -> f64 {
        params.time_step * (params.gravity_torque(theta) + torque) / params.moment() - params.drag * omega
    }

    fn theta_delta(params: &PendulumParams, omega: f64) -> f64 {
        omega * params.time_step
    }

    /// One fourth-order Runge-Kutta step under a constant applied torque.
    pub fn rk4_step(&mut self, params: &PendulumParams, torque: f64) {
        let (theta, omega) = (self.theta, self.omega);

        let k_omega_1 = Self::omega_delta(params, theta, omega, torque);
        let k_theta_1 = Self::theta_delta(params, omega);
        let k_omega_2 = Self::omega_delta(params, theta + 0.5 * k_theta_1, omega + 0.5 * k_omega_1, torque);
        let k_theta_2 = Self::theta_delta(params, omega + 0.5 * k_omega_1);
        let k_omega_3 = Self::omega_delta(params, theta + 0.5 * k_theta_2, omega + 0.5 * k_omega_2, torque);
        let k_theta_3 = Self::theta_delta(params, omega + 0.5 * k_omega_2);
        let k_omega_4 = Self::omega_delta(params, theta + k_theta_3, omega + k_omega_3, torque);
        let k_theta_4 = Self::theta_delta(params, omega + k_omega_3);

        self.omega = omega + (k_omega_1 + 2.0 * k_omega_2 + 2.0 * k_omega_3 + k_omega_4) / 6.0;
        self.theta = theta + (k_theta_1 + 2.0 * k_theta_2 + 2.0 * k_theta_3 + k_theta_4) / 6.0;
    }

    /// Hold `action` for `params.substeps` integration steps.
    pub fn advance(&mut self, params: &PendulumParams, action: TorqueAction) {
        let torque = params.torque_for(action);
        for _ in 0..params.substeps {
            self.rk4_step(params, torque);
        }
    }

    /// Wrap theta into [-pi, pi], then mirror into [0, pi].
    ///
    /// The system is symmetric about the vertical, so mirroring negates both
    /// theta and omega without changing the physics.
    pub fn fold(&mut self) {
        if self.theta > PI {
            self.theta -= 2.0 * PI;
        } else if self.theta < -PI {
            self.theta += 2.0 * PI;
        }
        if self.theta < 0.0 {
            self.theta = -self.theta;
            self.omega = -self.omega;
        }
    }
}

/// 1 within roughly 0.4 rad of upright, 0 elsewhere.
pub fn sparse_reward(theta: f64) -> f64 {
    if (theta / 2.0).sin().abs() < 0.2 {
        1.0
    } else {
        0.0
    }
}

/// Dense alternative: `cos(theta)`.
pub fn cosine_reward(theta: f64) -> f64 {
    theta.cos()
}

/// Swing-up heuristic.
///
/// Pumps energy by pushing along omega; once the motor can overpower gravity
/// near the top it pushes theta back toward zero instead.
pub fn rule_based_action(params: &PendulumParams, theta: f64, omega: f64) -> TorqueAction {
    let mut action = if omega < 0.0 { 0 } else { 1 };

    let can_hold = params.max_applied_torque > params.gravity_torque(theta).abs();
    if can_hold && (theta / 2.0).sin().abs() < 0.707 {
        action = if theta.sin() > 0.0 { 0 } else { 1 };
    }
    action
}

/// Convert between torque direction and energy action. The mapping flips
/// the action when omega is negative and is its own inverse.
pub fn flip_for_omega(action: usize, omega: f64) -> usize {
    if omega < 0.0 {
        1 - action.min(1)
    } else {
        action
    }
}
