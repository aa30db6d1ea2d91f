pub mod test_pendulum;
pub mod test_replay_buffer;
