use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/*
Lookahead Limiter
=================

Keeps a multichannel signal under a threshold without hard clipping.

The output runs `lookahead` seconds behind the input. Every incoming frame
is inspected before it is heard, so the gain can already be down when a
peak reaches the output:

  input ──→ [peak check] ──→ [delay: lookahead] ──→ × gain ──→ output
                 │                                     ↑
                 └──────── gain = thr / |peak| ────────┘

Gain behaviour
--------------

  peak over threshold:   gain = min(gain, threshold / |peak|)
                         hold = lookahead + release samples
  holding:               hold -= 1
  hold expired:          gain += (1 - gain) / release_samples, up to 1.0

The hold covers the time the peak spends inside the delay buffer, so every
over-threshold sample leaves the limiter at or below the threshold. All
channels share one gain, which keeps the stereo image steady while limiting.
*/

#[derive(Debug, Clone)]
pub struct LookaheadLimiter {
    channels: usize,
    threshold: f32,
    lookahead: f64,
    release: f64,

    lookahead_samples: usize,
    release_samples: usize,
    buffer: Vec<f32>,
    frame: usize,
    gain: f32,
    hold: usize,
}

impl LookaheadLimiter {
    pub fn new(channels: usize, threshold: f32, lookahead: f64, release: f64) -> Self {
        let mut limiter = Self {
            channels,
            threshold,
            lookahead: lookahead.max(0.0),
            release: release.max(0.0),
            lookahead_samples: 0,
            release_samples: 0,
            buffer: Vec::new(),
            frame: 0,
            gain: 1.0,
            hold: 0,
        };
        limiter.configure(crate::DEFAULT_SAMPLE_RATE);
        limiter
    }

    fn configure(&mut self, sample_rate: u32) {
        self.lookahead_samples = (self.lookahead * sample_rate as f64) as usize;
        self.release_samples = ((self.release * sample_rate as f64) as usize).max(1);
        self.buffer = vec![0.0; self.lookahead_samples * self.channels];
        self.frame = 0;
        self.gain = 1.0;
        self.hold = 0;
    }

    /// Current gain reduction factor, 1.0 when idle.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Output delay in samples.
    pub fn latency(&self) -> usize {
        self.lookahead_samples
    }
}

impl GraphNode for LookaheadLimiter {
    fn input_count(&self) -> usize {
        self.channels
    }

    fn output_count(&self) -> usize {
        self.channels
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.configure(ctx.sample_rate());
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let peak = inputs[..self.channels]
            .iter()
            .fold(0.0f32, |peak, x| peak.max(x.abs()));
        if peak > self.threshold {
            self.gain = self.gain.min(self.threshold / peak);
            self.hold = self.lookahead_samples + self.release_samples;
        }

        if self.lookahead_samples == 0 {
            for (out, x) in outputs.iter_mut().zip(&inputs[..self.channels]) {
                *out = x * self.gain;
            }
        } else {
            let start = self.frame * self.channels;
            let slot = &mut self.buffer[start..start + self.channels];
            for ((out, stored), x) in outputs.iter_mut().zip(slot.iter_mut()).zip(inputs) {
                *out = *stored * self.gain;
                *stored = *x;
            }
            self.frame = (self.frame + 1) % self.lookahead_samples;
        }

        if self.hold > 0 {
            self.hold -= 1;
        } else if self.gain < 1.0 {
            self.gain = (self.gain + (1.0 - self.gain) / self.release_samples as f32).min(1.0);
        }
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.frame = 0;
        self.gain = 1.0;
        self.hold = 0;
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
