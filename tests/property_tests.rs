#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use pendulum_q::agent::QAgent;
    use pendulum_q::config::ServiceConfig;
    use pendulum_q::exploration::GaussianNoise;
    use pendulum_q::model::QModel;
    use pendulum_q::pendulum::Pendulum;
    use pendulum_q::replay_buffer::{Record, ReplayBuffer};
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    // Strategy for generating arbitrary raw record text
    fn record_strategy() -> impl Strategy<Value = Record> {
        prop::collection::vec("[-0-9.a-z]{0,6}", 6)
            .prop_map(|values| Record::from_values(values).unwrap())
    }

    fn fresh_agent(seed: u64) -> QAgent {
        let config = ServiceConfig {
            model_path: std::env::temp_dir().join("pendulum-q-proptest-unused.bin"),
            hidden_layers: vec![8],
            seed: Some(seed),
            ..Default::default()
        };
        let model = QModel::fresh(&config.model_path, &config.hidden_layers).unwrap();
        QAgent::new(model, &config)
    }

    proptest! {
        #[test]
        fn test_buffer_never_exceeds_capacity(
            capacity in 1usize..64,
            records in prop::collection::vec(record_strategy(), 0..200)
        ) {
            let mut buffer = ReplayBuffer::new(capacity);
            for record in records.iter().cloned() {
                buffer.add(record);
                prop_assert!(buffer.len() <= capacity);
            }

            // the newest records survive, in order
            let kept: Vec<&Record> = buffer.iter().collect();
            let expected: Vec<&Record> = records.iter().skip(records.len().saturating_sub(capacity)).collect();
            prop_assert_eq!(kept, expected);
        }

        #[test]
        fn test_default_buffer_bound(count in 0usize..1500) {
            let mut buffer = ReplayBuffer::new(512);
            for i in 0..count {
                buffer.add(Record::from_values(vec![i.to_string(); 6]).unwrap());
            }
            prop_assert_eq!(buffer.len(), count.min(512));
        }

        #[test]
        fn test_action_is_zero_or_one(
            theta in -10.0f32..10.0,
            omega in -50.0f32..50.0,
            seed in any::<u64>()
        ) {
            let mut agent = fresh_agent(seed);
            let action = agent.act(array![theta, omega].view()).unwrap();
            prop_assert!(action == 0 || action == 1);
        }

        #[test]
        fn test_noise_std_decreases_but_stays_positive(
            std in 1e-12f64..10.0,
            decay in 1e-6f64..0.9,
            draws in 1usize..500
        ) {
            let mut noise = GaussianNoise::new(0.0, std, decay);
            let mut rng = StdRng::seed_from_u64(0);
            let mut previous = noise.std();
            for _ in 0..draws {
                noise.sample(2, &mut rng);
                prop_assert!(noise.std() < previous || noise.std() == f64::MIN_POSITIVE);
                prop_assert!(noise.std() > 0.0);
                previous = noise.std();
            }
        }

        #[test]
        fn test_fold_keeps_theta_in_range(
            theta in -2.0 * PI + 0.01..2.0 * PI - 0.01,
            omega in -10.0f64..10.0
        ) {
            let mut p = Pendulum::new(theta, omega);
            p.fold();
            prop_assert!(p.theta >= 0.0 && p.theta <= PI);
            prop_assert!((p.omega.abs() - omega.abs()).abs() < 1e-12);
        }
    }
}
