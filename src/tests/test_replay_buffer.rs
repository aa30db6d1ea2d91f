use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::error::PendulumError;
use crate::replay_buffer::{Record, ReplayBuffer, Transition};

fn record(values: [&str; 6]) -> Record {
    Record::from_values(values.iter().map(|v| v.to_string()).collect()).unwrap()
}

fn numbered(i: usize) -> Record {
    let theta = i.to_string();
    record([theta.as_str(), "0", "0", "0", "0", "0"])
}

#[test]
fn test_replay_buffer_add_and_sample() {
    let mut replay_buffer = ReplayBuffer::new(10);
    let r = record(["0.5", "-0.5", "1", "0.6", "-0.4", "1"]);
    replay_buffer.add(r.clone());
    assert_eq!(replay_buffer.len(), 1);

    let mut rng = StdRng::seed_from_u64(1);
    let sample = replay_buffer.sample(4, &mut rng).unwrap();
    assert_eq!(sample.len(), 4);
    assert!(sample.iter().all(|s| **s == r));
}

#[test]
fn test_replay_buffer_capacity() {
    let mut buffer = ReplayBuffer::new(3);
    for i in 0..5 {
        buffer.add(numbered(i));
    }

    // Should only keep last 3, oldest first
    assert_eq!(buffer.len(), 3);
    let thetas: Vec<&str> = buffer.iter().map(|r| r.fields[0].as_str()).collect();
    assert_eq!(thetas, vec!["2", "3", "4"]);
}

#[test]
fn test_default_capacity_window() {
    let mut buffer = ReplayBuffer::new(512);
    for i in 0..600 {
        buffer.add(numbered(i));
    }
    assert_eq!(buffer.len(), 512);
    assert_eq!(buffer.iter().next().unwrap().fields[0], "88");
    assert_eq!(buffer.iter().last().unwrap().fields[0], "599");
}

#[test]
fn test_replay_buffer_is_empty() {
    let mut buffer = ReplayBuffer::new(10);
    assert!(buffer.is_empty());
    buffer.add(numbered(0));
    assert!(!buffer.is_empty());
}

#[test]
fn test_sample_empty_buffer_fails() {
    let buffer = ReplayBuffer::new(10);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(buffer.sample(4, &mut rng), Err(PendulumError::EmptyBuffer(_))));
}

#[test]
fn test_sample_is_with_replacement() {
    let mut buffer = ReplayBuffer::new(10);
    buffer.add(numbered(0));
    buffer.add(numbered(1));

    let mut rng = StdRng::seed_from_u64(3);
    let sample = buffer.sample(64, &mut rng).unwrap();
    assert_eq!(sample.len(), 64);
    assert!(sample.iter().any(|r| r.fields[0] == "0"));
    assert!(sample.iter().any(|r| r.fields[0] == "1"));
}

#[test]
fn test_record_requires_six_fields() {
    let result = Record::from_values(vec!["1".to_string(); 5]);
    assert!(matches!(result, Err(PendulumError::DimensionMismatch { .. })));
    assert!(Record::from_values(vec!["1".to_string(); 7]).is_err());
}

#[test]
fn test_record_keeps_raw_text() {
    let r = record([" 1.5", "0.25 ", "1.000000", "1.6", "0.3", "0"]);
    assert_eq!(r.fields[0], " 1.5");
    assert_eq!(r.fields[2], "1.000000");
}

#[test]
fn test_parse_record() {
    let t = record([" 1.5", "0.25 ", "1.000000", "1.6", "-0.3", "1e0"]).parse(2).unwrap();
    assert_eq!(t.state.to_vec(), vec![1.5, 0.25]);
    assert_eq!(t.action, 1);
    assert_eq!(t.next_state.to_vec(), vec![1.6, -0.3]);
    assert_eq!(t.reward, 1.0);
}

#[test]
fn test_parse_truncates_action() {
    let t = record(["0", "0", "1.9", "0", "0", "0"]).parse(2).unwrap();
    assert_eq!(t.action, 1);
    let t = record(["0", "0", "0.7", "0", "0", "0"]).parse(2).unwrap();
    assert_eq!(t.action, 0);
}

#[test]
fn test_parse_rejects_out_of_range_action() {
    for action in ["2", "-1", "nan", "inf"] {
        let result = record(["0", "0", action, "0", "0", "0"]).parse(2);
        assert!(matches!(result, Err(PendulumError::InvalidAction { .. })), "action {}", action);
    }
}

#[test]
fn test_parse_rejects_non_numeric() {
    let result = record(["0", "0", "1", "0", "zero", "0"]).parse(2);
    match result {
        Err(PendulumError::InvalidValue { field, value }) => {
            assert_eq!(field, "omega_2");
            assert_eq!(value, "zero");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_record_from_transition() {
    let t = Transition {
        state: ndarray::array![0.5, -1.0],
        action: 1,
        reward: 0.0,
        next_state: ndarray::array![0.25, 2.0],
    };
    let r = Record::from(&t);
    assert_eq!(r.parse(2).unwrap(), t);
}
