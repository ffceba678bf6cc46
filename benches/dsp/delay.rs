//! Benchmarks for modulated delay and chorus.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polytone::graph::chorus::ChorusNode;
use polytone::graph::delay::ModulatedDelay;

use crate::{ready, run_block, BLOCK_SIZES};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        // Fractional delays force the cubic read
        for (name, taps) in [("one_tap", 1usize), ("four_taps", 4)] {
            let mut delay = ModulatedDelay::new(taps, 1.0);
            let mut ctx = ready(&mut delay);
            let mut inputs = vec![0.5f32];
            inputs.extend((1..=taps).map(|t| t as f32 * 0.0101));
            let mut out = [0.0];
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| run_block(&mut delay, &mut ctx, black_box(&inputs), &mut out, size))
            });
        }

        let mut chorus = ChorusNode::new(3, 0.01, 0.003, 0.5, 0.5);
        let mut ctx = ready(&mut chorus);
        let mut out = [0.0];
        group.bench_with_input(BenchmarkId::new("chorus", size), &size, |b, &size| {
            b.iter(|| run_block(&mut chorus, &mut ctx, black_box(&[0.5]), &mut out, size))
        });
    }

    group.finish();
}
