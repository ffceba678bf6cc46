use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::dsp::pinking::PinkingFilter;
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/*
Noise Sources
=============

White:  uniform samples in [-1, 1). Every frequency at equal power.
Pink:   white through one pinking filter. -3 dB/octave, sounds "even".
Brown:  white through two pinking filters. -6 dB/octave, a deep rumble.

Randomness comes from the render context: `init` forks a generator off the
session's seeded stream. Two renders with the same seed produce the same
noise, and a stateful clone keeps drawing the identical sequence.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

#[derive(Debug, Clone)]
pub struct NoiseNode {
    color: NoiseColor,
    amplitude: f32,
    rng: StdRng,
    pinking: [PinkingFilter; 2],
}

impl NoiseNode {
    pub fn new(color: NoiseColor, amplitude: f32) -> Self {
        Self {
            color,
            amplitude,
            rng: StdRng::seed_from_u64(0),
            pinking: [PinkingFilter::new(), PinkingFilter::new()],
        }
    }

    pub fn white() -> Self {
        Self::new(NoiseColor::White, 1.0)
    }

    pub fn pink() -> Self {
        Self::new(NoiseColor::Pink, 1.0)
    }

    pub fn brown() -> Self {
        Self::new(NoiseColor::Brown, 1.0)
    }
}

impl GraphNode for NoiseNode {
    fn input_count(&self) -> usize {
        0
    }

    fn output_count(&self) -> usize {
        1
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.rng = ctx.fork_rng();
    }

    fn process(&mut self, _ctx: &RenderCtx, _inputs: &[f32], outputs: &mut [f32]) {
        let white = self.rng.gen_range(-1.0f32..1.0) * self.amplitude;
        outputs[0] = match self.color {
            NoiseColor::White => white,
            NoiseColor::Pink => self.pinking[0].process(white),
            NoiseColor::Brown => {
                let pink = self.pinking[0].process(white);
                self.pinking[1].process(pink)
            }
        };
    }

    fn reset(&mut self) {
        for filter in &mut self.pinking {
            filter.reset();
        }
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(self.color, self.amplitude))
    }
}

/// Pinking filter as a 1-in/1-out node, for shaping any signal.
#[derive(Debug, Clone, Default)]
pub struct PinkingNode {
    filter: PinkingFilter,
}

impl PinkingNode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphNode for PinkingNode {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        outputs[0] = self.filter.process(inputs[0]);
    }

    fn reset(&mut self) {
        self.filter.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: &mut dyn GraphNode, seed: u64, samples: usize) -> Vec<f32> {
        let mut ctx = RenderCtx::new(44_100, seed);
        node.init(&mut ctx);
        let mut out = [0.0];
        (0..samples)
            .map(|_| {
                node.process(&ctx, &[], &mut out);
                out[0]
            })
            .collect()
    }

    #[test]
    fn same_seed_same_noise() {
        let a = render(&mut NoiseNode::white(), 9, 256);
        let b = render(&mut NoiseNode::white(), 9, 256);
        let c = render(&mut NoiseNode::white(), 10, 256);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn white_noise_is_bounded_and_centered() {
        let samples = render(&mut NoiseNode::white(), 1, 20_000);
        assert!(samples.iter().all(|s| (-1.0..1.0).contains(s)));
        let mean: f32 = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.05, "mean {}", mean);
    }

    #[test]
    fn colored_noise_is_smoother_than_white() {
        fn roughness(s: &[f32]) -> f32 {
            s.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f32>() / s.len() as f32
        }
        let white = render(&mut NoiseNode::white(), 3, 10_000);
        let pink = render(&mut NoiseNode::pink(), 3, 10_000);
        let brown = render(&mut NoiseNode::brown(), 3, 10_000);

        assert!(roughness(&pink) < roughness(&white));
        assert!(roughness(&brown) < roughness(&pink));
    }

    #[test]
    fn clone_state_continues_the_same_stream() {
        let mut node = NoiseNode::pink();
        render(&mut node, 5, 100);
        let mut copy = node.clone_state();

        let ctx = RenderCtx::new(44_100, 0);
        let (mut a, mut b) = ([0.0], [0.0]);
        for _ in 0..50 {
            node.process(&ctx, &[], &mut a);
            copy.process(&ctx, &[], &mut b);
            assert_eq!(a, b);
        }
    }
}
