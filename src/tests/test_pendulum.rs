use std::f64::consts::PI;
use crate::pendulum::{
    cosine_reward, flip_for_omega, rule_based_action, sparse_reward, Pendulum, PendulumParams,
};

#[test]
fn test_upright_equilibrium_without_torque() {
    let params = PendulumParams { drag: 0.0, ..Default::default() };
    let mut p = Pendulum::new(0.0, 0.0);
    for _ in 0..100 {
        p.rk4_step(&params, 0.0);
    }
    assert_eq!(p, Pendulum::new(0.0, 0.0));
}

#[test]
fn test_gravity_pulls_away_from_upright() {
    let params = PendulumParams::default();
    let mut p = Pendulum::new(0.1, 0.0);
    p.rk4_step(&params, 0.0);
    assert!(p.omega > 0.0);
    assert!(p.theta > 0.1);
}

#[test]
fn test_torque_direction() {
    let params = PendulumParams::default();
    let mut pushed = Pendulum::new(0.0, 0.0);
    pushed.advance(&params, 1);
    assert!(pushed.omega > 0.0);

    let mut pulled = Pendulum::new(0.0, 0.0);
    pulled.advance(&params, 0);
    assert!(pulled.omega < 0.0);
}

#[test]
fn test_fold_mirrors_negative_angles() {
    let mut p = Pendulum::new(-0.5, 1.0);
    p.fold();
    assert_eq!(p, Pendulum::new(0.5, -1.0));
}

#[test]
fn test_fold_wraps_past_pi() {
    let mut p = Pendulum::new(PI + 0.25, 2.0);
    p.fold();
    // wraps to -pi + 0.25 then mirrors
    assert!((p.theta - (PI - 0.25)).abs() < 1e-12);
    assert_eq!(p.omega, -2.0);

    let mut q = Pendulum::new(-PI - 0.25, 1.0);
    q.fold();
    assert!((q.theta - (PI - 0.25)).abs() < 1e-12);
    assert_eq!(q.omega, 1.0);
}

#[test]
fn test_rewards() {
    assert_eq!(sparse_reward(0.0), 1.0);
    assert_eq!(sparse_reward(0.3), 1.0);
    assert_eq!(sparse_reward(0.5), 0.0);
    assert_eq!(sparse_reward(PI), 0.0);
    assert!((cosine_reward(0.0) - 1.0).abs() < 1e-12);
    assert!((cosine_reward(PI) + 1.0).abs() < 1e-12);
}

#[test]
fn test_rule_based_pumps_energy_far_from_top() {
    let params = PendulumParams::default();
    // far from upright: follow omega
    assert_eq!(rule_based_action(&params, 3.0, 1.0), 1);
    assert_eq!(rule_based_action(&params, 3.0, -1.0), 0);
}

#[test]
fn test_rule_based_holds_near_top() {
    let params = PendulumParams::default();
    // gravity torque 5 * 0.8 * sin(0.3) < 3 and near upright: push back toward 0
    assert_eq!(rule_based_action(&params, 0.3, 1.0), 0);
    assert_eq!(rule_based_action(&params, 0.3, -1.0), 0);
}

#[test]
fn test_flip_for_omega_is_involution() {
    for action in [0, 1] {
        for omega in [-1.0, 0.0, 1.0] {
            assert_eq!(flip_for_omega(flip_for_omega(action, omega), omega), action);
        }
    }
    assert_eq!(flip_for_omega(1, -0.5), 0);
    assert_eq!(flip_for_omega(1, 0.5), 1);
}
