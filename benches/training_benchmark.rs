//! Benchmarks of the Q-learning training loop and policy extraction
//!
//! Training runs the default 4x4 layout with a fixed seed so every
//! iteration does the same work.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridq::agent::{PolicyExtractor, QLearningTrainer};
use gridq::builders::QLearningConfigBuilder;
use gridq::config::QLearningConfig;
use gridq::grid::GridModel;

fn bench_training(c: &mut Criterion) {
    let config = QLearningConfig {
        seed: Some(42),
        ..QLearningConfig::default()
    };
    let grid = GridModel::new(&config.grid).unwrap();

    c.bench_function("train_default_4x4", |b| {
        b.iter(|| {
            let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
            black_box(trainer.train().unwrap())
        })
    });

    let capped = QLearningConfigBuilder::new()
        .goals(15, 11)
        .forbidden(4)
        .wall(9)
        .max_episodes(1_000)
        .patience(usize::MAX)
        .seed(42)
        .build()
        .unwrap();
    c.bench_function("train_1000_episodes", |b| {
        b.iter(|| {
            let mut trainer = QLearningTrainer::new(&grid, &capped).unwrap();
            black_box(trainer.train().unwrap())
        })
    });
}

fn bench_policy(c: &mut Criterion) {
    let config = QLearningConfig {
        seed: Some(42),
        ..QLearningConfig::default()
    };
    let grid = GridModel::new(&config.grid).unwrap();
    let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
    trainer.train().unwrap();
    let table = trainer.into_q_table();
    let policy = PolicyExtractor::new(&grid, &table);

    c.bench_function("optimal_policy", |b| {
        b.iter(|| black_box(policy.optimal_policy().unwrap()))
    });
    c.bench_function("trace_path", |b| {
        b.iter(|| black_box(policy.trace_path(grid.start()).count()))
    });
}

criterion_group!(benches, bench_training, bench_policy);
criterion_main!(benches);
