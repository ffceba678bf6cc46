//! Benchmarks for complete preset voices.
//!
//! Each voice is held at a sustaining note, which is where a voice spends
//! most of its life.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polytone::voices;
use rand::{rngs::StdRng, SeedableRng};

use crate::{ready, run_block, BLOCK_SIZES};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    // A3 at full velocity, gate held
    let inputs = [220.0, 1.0, 0.8, 0.0];

    for &size in BLOCK_SIZES {
        for name in voices::NAMES {
            let Some(instrument) = voices::by_name(name) else {
                continue;
            };
            let mut rng = StdRng::seed_from_u64(3);
            let mut voice = instrument
                .voice_factory()
                .create_voice(&mut rng)
                .expect("preset voices build");
            let mut ctx = ready(voice.as_mut());
            let mut out = [0.0; 2];
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| run_block(voice.as_mut(), &mut ctx, black_box(&inputs), &mut out, size))
            });
        }
    }

    group.finish();
}
