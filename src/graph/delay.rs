use crate::dsp::delay::DelayLine;
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/// Multi-tap delay with per-sample delay times.
///
/// Inputs are `[signal, delay_1, .., delay_taps]`, delays in seconds and
/// clamped to `[0, max_delay]`. The output is the sum of all taps, each
/// read with cubic interpolation so delay times can glide smoothly.
///
/// A delay of 0 reads the sample that was just written.
#[derive(Debug, Clone)]
pub struct ModulatedDelay {
    taps: usize,
    max_delay: f64,
    sample_rate: f64,
    line: DelayLine,
}

impl ModulatedDelay {
    pub fn new(taps: usize, max_delay: f64) -> Self {
        let sample_rate = crate::DEFAULT_SAMPLE_RATE as f64;
        Self {
            taps,
            max_delay: max_delay.max(0.0),
            sample_rate,
            line: DelayLine::new(capacity(max_delay, sample_rate)),
        }
    }

    pub fn taps(&self) -> usize {
        self.taps
    }

    pub fn max_delay(&self) -> f64 {
        self.max_delay
    }
}

fn capacity(max_delay: f64, sample_rate: f64) -> usize {
    (max_delay.max(0.0) * sample_rate).ceil() as usize + 1
}

impl GraphNode for ModulatedDelay {
    fn input_count(&self) -> usize {
        self.taps + 1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.sample_rate = ctx.sample_rate() as f64;
        self.line = DelayLine::new(capacity(self.max_delay, self.sample_rate));
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        self.line.write(inputs[0]);

        let mut sum = 0.0;
        for &delay in &inputs[1..=self.taps] {
            let seconds = (delay as f64).clamp(0.0, self.max_delay);
            sum += self.line.read((seconds * self.sample_rate) as f32);
        }
        outputs[0] = sum;
    }

    fn reset(&mut self) {
        self.line.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        let mut fresh = self.clone();
        fresh.line.reset();
        Box::new(fresh)
    }
}
