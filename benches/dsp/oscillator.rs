//! Benchmarks for oscillators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polytone::dsp::waveshape::Waveform;
use polytone::graph::noise::{NoiseColor, NoiseNode};
use polytone::graph::oscillator::{FmOscillator, OscNode, PwmOscillator, PwmShape};

use crate::{ready, run_block, BLOCK_SIZES};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut out = [0.0];

        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("saw", Waveform::Saw),
            ("soft_saw", Waveform::SoftSaw),
            ("pulse", Waveform::Pulse { duty: 0.25 }),
        ] {
            let mut osc = OscNode::new(waveform, 1.0, 0.0);
            let mut ctx = ready(&mut osc);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| run_block(&mut osc, &mut ctx, black_box(&[440.0]), &mut out, size))
            });
        }

        let mut fm = FmOscillator::new(1.0, 2.0);
        let mut ctx = ready(&mut fm);
        group.bench_with_input(BenchmarkId::new("fm", size), &size, |b, &size| {
            b.iter(|| run_block(&mut fm, &mut ctx, black_box(&[440.0, 1.5]), &mut out, size))
        });

        let mut pwm = PwmOscillator::new(PwmShape::Triangle, 0.6, 1.0);
        let mut ctx = ready(&mut pwm);
        group.bench_with_input(BenchmarkId::new("pwm", size), &size, |b, &size| {
            b.iter(|| run_block(&mut pwm, &mut ctx, black_box(&[440.0, 3.0]), &mut out, size))
        });

        let mut noise = NoiseNode::new(NoiseColor::Pink, 1.0);
        let mut ctx = ready(&mut noise);
        group.bench_with_input(BenchmarkId::new("pink_noise", size), &size, |b, &size| {
            b.iter(|| run_block(&mut noise, &mut ctx, &[], &mut out, size))
        });
    }

    group.finish();
}
