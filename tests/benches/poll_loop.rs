//! Poll loop throughput benchmarks
//!
//! The firmware polls every 5 ms, so a single poll has a 5 ms budget on
//! target; these benches confirm the host-side cost is nowhere near it.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use crosslight_core::test_utils::Harness;

fn bench_steady_state(c: &mut Criterion) {
    c.bench_function("steady_green_1s", |b| {
        b.iter_batched(
            || {
                let mut harness = Harness::new();
                harness.set_car(2, true);
                harness.run_ms(100);
                harness
            },
            |mut harness| harness.run_ms(1_000),
            BatchSize::SmallInput,
        )
    });
}

fn bench_full_handover(c: &mut Criterion) {
    c.bench_function("full_handover", |b| {
        b.iter_batched(
            || {
                let mut harness = Harness::new();
                harness.set_car(1, true);
                harness
            },
            |mut harness| harness.run_ms(20_000),
            BatchSize::SmallInput,
        )
    });
}

fn bench_contested_cycle(c: &mut Criterion) {
    c.bench_function("contested_cycle_60s", |b| {
        b.iter_batched(
            || {
                let mut harness = Harness::new();
                harness.set_car(1, true);
                harness.set_car(2, true);
                harness
            },
            |mut harness| harness.run_ms(60_000),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_steady_state, bench_full_handover, bench_contested_cycle);
criterion_main!(benches);
