//! Benchmarks for biquad and state-variable filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polytone::dsp::svf::SvfShape;
use polytone::graph::filter::{BiquadNode, SvfNode, SvfParam};
use polytone::graph::node::GraphNode;

use crate::{ready, run_block, BLOCK_SIZES};

fn bench_node(c: &mut Criterion, name: &str, mut make: impl FnMut() -> Box<dyn GraphNode>, inputs: &[f32]) {
    let mut group = c.benchmark_group("dsp/filter");
    for &size in BLOCK_SIZES {
        let mut node = make();
        let mut ctx = ready(node.as_mut());
        let mut out = [0.0];
        group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
            b.iter(|| run_block(node.as_mut(), &mut ctx, black_box(inputs), &mut out, size))
        });
    }
    group.finish();
}

pub fn bench_filter(c: &mut Criterion) {
    bench_node(c, "biquad_lowpass", || Box::new(BiquadNode::lowpass(1_000.0, 0.7)), &[0.5]);
    bench_node(c, "biquad_bell", || Box::new(BiquadNode::bell(1_000.0, 1.0, 6.0)), &[0.5]);
    bench_node(c, "svf_lowpass", || Box::new(SvfNode::lowpass(1_000.0, 0.7)), &[0.5]);

    // Cutoff read from an input every frame
    bench_node(
        c,
        "svf_cutoff_input",
        || {
            Box::new(
                SvfNode::new(SvfShape::Lowpass, SvfParam::Input, SvfParam::Fixed(0.7), None)
                    .expect("lowpass takes no gain"),
            )
        },
        &[0.5, 1_200.0],
    );
}
