use crate::dsp::interpolate::xerp;
use crate::dsp::waveshape::{sine, wrap_phase};
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/// Frequency vibrato: `frequency -> frequency * wobble`.
///
/// The wobble swings between `1/f` and `f` on an exponential scale, driven
/// by a sine LFO, where `f = 1 + amount * min(t / fade_in, 1)`. The depth
/// grows from nothing to `amount` over the first `fade_in` seconds of the
/// note, the way a player settles into vibrato after the attack.
///
/// Place it in front of an oscillator's frequency input.
#[derive(Debug, Clone)]
pub struct VibratoNode {
    fade_in: f64,
    amount: f64,
    frequency: f64,
    initial_phase: f64,

    phase: f64,
    elapsed: f64,
}

impl VibratoNode {
    pub fn new(fade_in: f64, amount: f64, frequency: f64) -> Self {
        Self {
            fade_in,
            amount,
            frequency,
            initial_phase: 0.0,
            phase: 0.0,
            elapsed: 0.0,
        }
    }

    /// Start the LFO at `phase` (in cycles). Kept across `reset`.
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.initial_phase = wrap_phase(phase);
        self.phase = self.initial_phase;
        self
    }

    fn depth(&self) -> f64 {
        let ramp = if self.fade_in > 0.0 {
            (self.elapsed / self.fade_in).min(1.0)
        } else {
            1.0
        };
        1.0 + self.amount * ramp
    }
}

impl GraphNode for VibratoNode {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let dt = ctx.time_step();
        self.phase = wrap_phase(self.phase + self.frequency * dt);
        let lfo = sine(self.phase) * 0.5 + 0.5;

        let factor = self.depth();
        self.elapsed += dt;

        outputs[0] = (xerp(1.0 / factor, factor, lfo) * inputs[0] as f64) as f32;
    }

    fn reset(&mut self) {
        self.phase = self.initial_phase;
        self.elapsed = 0.0;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        let mut fresh = self.clone();
        fresh.reset();
        Box::new(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(node: &mut VibratoNode, seconds: f64) -> Vec<f32> {
        let mut ctx = RenderCtx::new(1_000, 0);
        node.init(&mut ctx);
        let mut out = [0.0];
        (0..(seconds * 1_000.0) as usize)
            .map(|_| {
                node.process(&ctx, &[440.0], &mut out);
                ctx.tick();
                out[0]
            })
            .collect()
    }

    #[test]
    fn zero_amount_leaves_frequency_alone() {
        let out = run(&mut VibratoNode::new(0.5, 0.0, 5.0), 1.0);
        assert!(out.iter().all(|f| (f - 440.0).abs() < 1e-3));
    }

    #[test]
    fn depth_fades_in_then_stays_in_range() {
        let out = run(&mut VibratoNode::new(1.0, 0.02, 5.0), 3.0);

        let early = out[..100].iter().fold(0.0f32, |m, f| m.max((f - 440.0).abs()));
        let late = out[2_000..].iter().fold(0.0f32, |m, f| m.max((f - 440.0).abs()));
        assert!(early < late);

        let (lo, hi) = (440.0 / 1.02, 440.0 * 1.02);
        assert!(out.iter().all(|&f| f >= lo - 1e-2 && f <= hi + 1e-2));
    }

    #[test]
    fn reset_replays_the_same_wobble() {
        let mut node = VibratoNode::new(0.2, 0.05, 6.0).with_phase(0.25);
        let first = run(&mut node, 0.5);
        node.reset();
        assert_eq!(first, run(&mut node, 0.5));
    }
}
