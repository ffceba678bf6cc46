//! Benchmarks for gate-driven envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polytone::dsp::envelope::{Shape, ShapeSection};
use polytone::graph::envelope::{AdsrNode, ControlledShapeEnvelope};

use crate::{ready, run_block, BLOCK_SIZES};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut out = [0.0];

        // Long attack keeps the envelope ramping for the whole benchmark
        let mut adsr = AdsrNode::new(3_600.0, 0.1, 0.7, 0.3);
        let mut ctx = ready(&mut adsr);
        group.bench_with_input(BenchmarkId::new("adsr_attack", size), &size, |b, &size| {
            b.iter(|| run_block(&mut adsr, &mut ctx, black_box(&[1.0]), &mut out, size))
        });

        let mut adsr = AdsrNode::new(0.001, 0.001, 0.7, 0.3);
        let mut ctx = ready(&mut adsr);
        run_block(&mut adsr, &mut ctx, &[1.0], &mut out, 1_000);
        group.bench_with_input(BenchmarkId::new("adsr_sustain", size), &size, |b, &size| {
            b.iter(|| run_block(&mut adsr, &mut ctx, black_box(&[1.0]), &mut out, size))
        });

        // Many sections: exercises the cursor walking forward
        let sections = (0..64)
            .map(|i| ShapeSection::new((i % 2) as f64, 0.001, 1.5))
            .chain(std::iter::once(ShapeSection::linear(0.5, 3_600.0)))
            .collect();
        let mut shape = ControlledShapeEnvelope::new(Shape::new(sections), None);
        let mut ctx = ready(&mut shape);
        group.bench_with_input(BenchmarkId::new("shape_sections", size), &size, |b, &size| {
            b.iter(|| run_block(&mut shape, &mut ctx, black_box(&[1.0]), &mut out, size))
        });
    }

    group.finish();
}
