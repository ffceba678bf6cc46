//! Benchmarks for composition overhead.
//!
//! Each combinator copies values between preallocated scratch buffers; these
//! cases show what that costs next to the nodes it wires together.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polytone::graph::{
    branch::wet_dry,
    extensions::NodeExt,
    node::{BoxedNode, GraphNode},
    oscillator::OscNode,
    util::{CustomNode, GainNode, PassNode},
};

use crate::{ready, run_block, BLOCK_SIZES};

fn cases() -> Vec<(&'static str, BoxedNode, Vec<f32>)> {
    let osc = || OscNode::sine();
    let result = (|| -> polytone::error::Result<Vec<(&'static str, BoxedNode, Vec<f32>)>> {
        Ok(vec![
            ("bare", osc().boxed(), vec![440.0]),
            ("through", osc().through(GainNode::new(1, 0.5))?.boxed(), vec![440.0]),
            ("mix", osc().mix(osc())?.boxed(), vec![440.0]),
            ("amplify_split", osc().amplify_split(PassNode::new(1))?.boxed(), vec![440.0, 0.5]),
            ("stack", osc().repeat(8)?.boxed(), vec![440.0; 8]),
            (
                "wet_dry",
                osc().through(wet_dry(CustomNode::new(1, 1, |i, o| o[0] = i[0] * i[0]).boxed(), 0.3)?)?.boxed(),
                vec![440.0],
            ),
        ])
    })();
    result.expect("bench graphs are well formed")
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        for (name, mut node, inputs) in cases() {
            let mut ctx = ready(node.as_mut());
            let mut out = vec![0.0; node.output_count()];
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| run_block(node.as_mut(), &mut ctx, black_box(&inputs), &mut out, size))
            });
        }
    }

    group.finish();
}
