//! Benchmarks for DSP nodes and real-world scenarios.
//!
//! Run with: cargo bench
//!
//! Nodes process one frame per call, so each benchmark drives a node for a
//! block of frames the way the live player does between sink writes.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples   = 1.33ms deadline
//!   - 256 samples  = 5.33ms deadline
//!   - 1024 samples = 21.3ms deadline (one live block)
//!
//! Benchmark groups:
//!   - dsp/*        Single nodes (oscillator, filter, envelope, etc.)
//!   - scenarios/*  Preset voices, instrument players and full song mixes

use criterion::{criterion_group, criterion_main};
use polytone::graph::node::{GraphNode, RenderCtx};

mod dsp;
mod scenarios;

/// Common block sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

pub const SAMPLE_RATE: u32 = 48_000;

/// Drive `node` for `frames` ticks with constant `inputs`. Returns the
/// last left sample so the work can't be optimised away.
pub fn run_block(
    node: &mut dyn GraphNode,
    ctx: &mut RenderCtx,
    inputs: &[f32],
    out: &mut [f32],
    frames: usize,
) -> f32 {
    for _ in 0..frames {
        node.process(ctx, inputs, out);
        ctx.tick();
    }
    out.first().copied().unwrap_or_default()
}

/// A context that has already been handed to `node.init`.
pub fn ready(node: &mut dyn GraphNode) -> RenderCtx {
    let mut ctx = RenderCtx::new(SAMPLE_RATE, 7);
    node.init(&mut ctx);
    ctx
}

criterion_group!(
    benches,
    // Single nodes
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_envelope,
    dsp::bench_distortion,
    dsp::bench_delay,
    dsp::bench_mix,
    // Real-world scenarios
    scenarios::bench_voices,
    scenarios::bench_mix,
);
criterion_main!(benches);
