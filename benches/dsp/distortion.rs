//! Benchmarks for waveshaping distortion.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polytone::graph::distortion::{Distortion, DistortionShape};

use crate::{ready, run_block, BLOCK_SIZES};

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        let mut out = [0.0];

        for (name, shape) in [
            ("soft_clip", DistortionShape::SoftClip),
            ("hard_clip", DistortionShape::HardClip { hardness: 4.0 }),
            ("tanh", DistortionShape::Tanh { hardness: 3.0 }),
            ("foldback", DistortionShape::Foldback { drive: 2.0, threshold: 0.6 }),
        ] {
            let mut node = Distortion::new(shape);
            let mut ctx = ready(&mut node);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| run_block(&mut node, &mut ctx, black_box(&[0.8]), &mut out, size))
            });
        }
    }

    group.finish();
}
