use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{GraphError, PlaybackError};
use crate::graph::extensions::NodeExt;
use crate::graph::limiter::LookaheadLimiter;
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};
use crate::graph::through::Pipeline;
use crate::io::pcm;
use crate::runtime::sink::PcmSink;

/*
Live Player
===========

Streams a source graph to an output in real time.

  control thread                      render thread
  ──────────────                      ─────────────
  spawn ───────────────────────────→  loop:
  sleep(duration)                       render block_frames through
                                          [node → limiter]
                                        convert to interleaved i16
                                        sink.write(block)   (blocks while full)
  stop flag ───────────────────────→  exit at the next block boundary
  join  ←──────────────────────────── hands the sink back
  sink.drain()

The render thread owns the graph and its context outright. Nothing on it is
shared with the caller, which is what lets an export run the same song on
another thread from a stateful clone.

The limiter delays its output by the lookahead, so the thread renders that
many extra frames to play the end of the song out. It also stops by itself
once the duration is covered, which keeps a sink without backpressure from
collecting audio forever.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LivePlayerConfig {
    pub block_frames: usize,
    pub channels: usize,
    pub limiter_threshold: f32,
    pub limiter_lookahead: f64,
    pub limiter_release: f64,
    /// Device ring buffer size, in blocks.
    pub ring_blocks: usize,
}

impl Default for LivePlayerConfig {
    fn default() -> Self {
        Self {
            block_frames: crate::LIVE_BLOCK_FRAMES,
            channels: 2,
            limiter_threshold: 0.99,
            limiter_lookahead: 0.1,
            limiter_release: 2.0,
            ring_blocks: 8,
        }
    }
}

impl LivePlayerConfig {
    pub fn with_block_frames(mut self, frames: usize) -> Self {
        self.block_frames = frames.max(1);
        self
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_limiter(mut self, threshold: f32, lookahead: f64, release: f64) -> Self {
        self.limiter_threshold = threshold;
        self.limiter_lookahead = lookahead;
        self.limiter_release = release;
        self
    }

    pub fn with_ring_blocks(mut self, blocks: usize) -> Self {
        self.ring_blocks = blocks.max(1);
        self
    }

    /// Samples held by a device ring of `ring_blocks` blocks.
    pub fn ring_capacity(&self) -> usize {
        self.ring_blocks * self.block_frames * self.channels
    }
}

#[derive(Debug, Clone, Default)]
pub struct LivePlayer {
    config: LivePlayerConfig,
}

impl LivePlayer {
    pub fn new(config: LivePlayerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LivePlayerConfig {
        &self.config
    }

    /// Initialize `node` on `ctx` and play it for `duration`.
    ///
    /// Returns the sink once the render thread has stopped and the sink has
    /// drained.
    pub fn play<S>(
        &self,
        mut node: BoxedNode,
        mut ctx: RenderCtx,
        sink: S,
        duration: Duration,
    ) -> Result<S, PlaybackError>
    where
        S: PcmSink + 'static,
    {
        self.check(node.as_ref())?;
        node.init(&mut ctx);
        self.play_running(node, ctx, sink, duration)
    }

    /// Play a graph that was already initialized on `ctx`.
    pub fn play_running<S>(
        &self,
        node: BoxedNode,
        mut ctx: RenderCtx,
        mut sink: S,
        duration: Duration,
    ) -> Result<S, PlaybackError>
    where
        S: PcmSink + 'static,
    {
        self.check(node.as_ref())?;

        let config = self.config;
        let mut limiter = LookaheadLimiter::new(
            config.channels,
            config.limiter_threshold,
            config.limiter_lookahead,
            config.limiter_release,
        );
        limiter.init(&mut ctx);

        let frames = (duration.as_secs_f64() * ctx.sample_rate() as f64).ceil() as usize
            + limiter.latency();
        let mut chain = Pipeline::new(vec![node, limiter.boxed()])?;

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        info!(
            sample_rate = ctx.sample_rate(),
            seconds = duration.as_secs_f64(),
            "live playback started"
        );

        let handle = thread::Builder::new()
            .name("polytone-live".into())
            .spawn(move || {
                render_blocks(&mut chain, &mut ctx, &mut sink, &config, frames, &thread_stop)
                    .map(|()| sink)
            })
            .map_err(|e| PlaybackError::Spawn("live", e))?;

        thread::sleep(duration);
        stop.store(true, Ordering::Release);

        let mut sink = handle
            .join()
            .map_err(|_| PlaybackError::ThreadPanicked("live"))??;
        sink.drain()?;
        info!("live playback stopped");
        Ok(sink)
    }

    fn check(&self, node: &dyn GraphNode) -> Result<(), GraphError> {
        if node.input_count() != 0 {
            return Err(GraphError::NotASource {
                inputs: node.input_count(),
            });
        }
        if node.output_count() != self.config.channels {
            return Err(GraphError::arity(
                "live player",
                self.config.channels,
                node.output_count(),
            ));
        }
        Ok(())
    }
}

fn render_blocks<S: PcmSink>(
    chain: &mut Pipeline,
    ctx: &mut RenderCtx,
    sink: &mut S,
    config: &LivePlayerConfig,
    frames: usize,
    stop: &AtomicBool,
) -> Result<(), PlaybackError> {
    let channels = config.channels;
    let mut block = vec![0.0f32; config.block_frames * channels];
    let mut pcm_block = Vec::with_capacity(block.len());
    let mut rendered = 0;
    let mut blocks = 0usize;

    while rendered < frames && !stop.load(Ordering::Acquire) {
        let count = config.block_frames.min(frames - rendered);
        let samples = &mut block[..count * channels];
        for frame in samples.chunks_exact_mut(channels) {
            chain.process(ctx, &[], frame);
            ctx.tick();
        }

        pcm::convert_into(samples, &mut pcm_block);
        sink.write(&pcm_block)?;
        rendered += count;
        blocks += 1;
    }

    debug!(blocks, frames = rendered, "render thread finished");
    Ok(())
}
