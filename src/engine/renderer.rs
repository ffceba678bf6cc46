use tracing::{debug, info};

use crate::error::{GraphError, Result};
use crate::graph::node::{GraphNode, RenderCtx};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderConfig {
    pub sample_rate: u32,
    pub seed: u64,
    /// Extra seconds rendered after the requested duration, for release tails.
    pub tail_seconds: f64,
    /// How many progress reports a render logs. 0 disables them.
    pub progress_steps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            seed: 0,
            tail_seconds: 0.0,
            progress_steps: 4,
        }
    }
}

impl RenderConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tail(mut self, seconds: f64) -> Self {
        self.tail_seconds = seconds;
        self
    }

    pub fn with_progress_steps(mut self, steps: u32) -> Self {
        self.progress_steps = steps;
        self
    }

    /// A fresh context for this configuration.
    pub fn context(&self) -> RenderCtx {
        RenderCtx::new(self.sample_rate, self.seed)
    }
}

/// One buffer per channel, all the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl RenderedAudio {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample over all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0, |peak: f32, s| peak.max(s.abs()))
    }

    /// Frame-interleaved copy: `[l0, r0, l1, r1, ...]`.
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for frame in 0..frames {
            out.extend(self.channels.iter().map(|c| c[frame]));
        }
        out
    }
}

/// Batch renderer: runs a source node for a fixed duration as fast as it can.
#[derive(Debug, Clone, Default)]
pub struct OfflineRenderer {
    config: RenderConfig,
}

impl OfflineRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// `init` the node on a fresh context, then render `duration` seconds
    /// plus the configured tail.
    pub fn render(&self, node: &mut dyn GraphNode, duration: f64) -> Result<RenderedAudio> {
        let mut ctx = self.config.context();
        node.init(&mut ctx);
        self.render_with(node, &mut ctx, duration)
    }

    /// Render with a caller-provided context, without calling `init`.
    ///
    /// Used to continue a graph that is already running, e.g. a stateful
    /// clone taken mid-song together with a clone of its context.
    pub fn render_with(
        &self,
        node: &mut dyn GraphNode,
        ctx: &mut RenderCtx,
        duration: f64,
    ) -> Result<RenderedAudio> {
        if node.input_count() != 0 {
            return Err(GraphError::NotASource {
                inputs: node.input_count(),
            });
        }

        let seconds = (duration + self.config.tail_seconds).max(0.0);
        let ticks = (seconds * ctx.sample_rate() as f64).ceil() as usize;
        let channels = node.output_count();
        debug!(ticks, channels, sample_rate = ctx.sample_rate(), "offline render");

        let mut buffers = vec![Vec::with_capacity(ticks); channels];
        let mut frame = vec![0.0; channels];
        let steps = self.config.progress_steps as usize;
        let mut next_report = 1;

        for tick in 0..ticks {
            node.process(ctx, &[], &mut frame);
            for (buffer, &sample) in buffers.iter_mut().zip(&frame) {
                buffer.push(sample);
            }
            ctx.tick();

            if steps > 0 && next_report <= steps && (tick + 1) * steps >= next_report * ticks {
                info!(percent = next_report * 100 / steps, "rendering");
                next_report += 1;
            }
        }

        Ok(RenderedAudio {
            sample_rate: ctx.sample_rate(),
            channels: buffers,
        })
    }
}
