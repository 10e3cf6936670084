//! Benchmarks for the relocation step

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use schelling_sim::sim::{SimConfig, SimGrid};

fn bench_step(c: &mut Criterion) {
    let config = SimConfig::default();

    c.bench_function("step_30x30", |b| {
        b.iter_batched(
            || SimGrid::new(&config).unwrap(),
            |mut grid| grid.step().unwrap(),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("find_unsatisfied_30x30", |b| {
        let grid = SimGrid::new(&config).unwrap();
        b.iter(|| grid.find_unsatisfied())
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
