//! Latency of the request paths: one noisy prediction, one minibatch fit and
//! a full `/train` call including the model save.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::{arr2, array};
use pendulum_q::agent::QAgent;
use pendulum_q::config::ServiceConfig;
use pendulum_q::model::QModel;
use pendulum_q::replay_buffer::Record;
use tempfile::TempDir;

fn bench_agent(dir: &TempDir) -> QAgent {
    let config = ServiceConfig {
        model_path: dir.path().join("bench.bin"),
        seed: Some(1),
        ..Default::default()
    };
    let model = QModel::fresh(&config.model_path, &config.hidden_layers).unwrap();
    let mut agent = QAgent::new(model, &config);
    for i in 0..512 {
        let theta = (i as f32 / 512.0 * 3.14).to_string();
        let record = Record::from_values(vec![
            theta.clone(),
            "0.1".to_string(),
            (i % 2).to_string(),
            theta,
            "0.2".to_string(),
            "0".to_string(),
        ])
        .unwrap();
        agent.remember(record);
    }
    agent
}

fn bench_predict(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut agent = bench_agent(&dir);
    let state = array![1.2f32, -0.4];

    c.bench_function("act", |b| {
        b.iter(|| black_box(agent.act(black_box(state.view())).unwrap()))
    });
}

fn bench_fit(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut agent = bench_agent(&dir);
    let features = arr2(&[[0.1f32, 0.2], [1.0, -0.5], [2.0, 0.3], [3.0, 0.0]]);
    let targets = arr2(&[[0.5f32, 0.1], [0.0, 1.0], [0.2, 0.2], [1.0, 0.0]]);

    c.bench_function("train_minibatch_4", |b| {
        b.iter(|| {
            black_box(
                agent
                    .model
                    .network
                    .train_minibatch(features.view(), targets.view(), 1e-4)
                    .unwrap(),
            )
        })
    });
}

fn bench_train_call(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut agent = bench_agent(&dir);

    let mut group = c.benchmark_group("train");
    group.sample_size(20);
    group.bench_function("batches_8_with_save", |b| {
        b.iter(|| black_box(agent.train(8).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_predict, bench_fit, bench_train_call);
criterion_main!(benches);
