use std::thread;
use std::time::Duration;

use tracing::info;

use crate::engine::renderer::{OfflineRenderer, RenderConfig, RenderedAudio};
use crate::error::{GraphError, PlaybackError};
use crate::graph::node::{BoxedNode, RenderCtx};
use crate::runtime::live::{LivePlayer, LivePlayerConfig};
use crate::runtime::sink::PcmSink;

/// Result of a session: the exported buffers and the sink the live side
/// played into.
pub struct SessionOutput<S> {
    pub audio: RenderedAudio,
    pub sink: S,
}

/// One song graph, played live and exported at the same time.
///
/// The graph is initialized once, then split: the export thread gets a
/// stateful clone of the graph and of the context, the live thread gets
/// the originals. From there the two copies never touch each other, and
/// both produce the same samples (before the live limiter).
pub struct Session {
    node: BoxedNode,
    render: RenderConfig,
    live: LivePlayerConfig,
}

impl Session {
    pub fn new(node: BoxedNode, render: RenderConfig, live: LivePlayerConfig) -> Self {
        Self { node, render, live }
    }

    pub fn play_and_export<S>(
        self,
        sink: S,
        duration: Duration,
    ) -> Result<SessionOutput<S>, PlaybackError>
    where
        S: PcmSink + 'static,
    {
        let Session {
            mut node,
            render,
            live,
        } = self;
        if node.input_count() != 0 {
            return Err(GraphError::NotASource {
                inputs: node.input_count(),
            }
            .into());
        }

        let mut ctx = RenderCtx::new(render.sample_rate, render.seed);
        node.init(&mut ctx);

        let mut export_node = node.clone_state();
        let mut export_ctx = ctx.clone();
        let seconds = duration.as_secs_f64();

        info!(seconds, "starting live playback with concurrent export");
        let export = thread::Builder::new()
            .name("polytone-export".into())
            .spawn(move || {
                OfflineRenderer::new(render).render_with(export_node.as_mut(), &mut export_ctx, seconds)
            })
            .map_err(|e| PlaybackError::Spawn("export", e))?;

        let live_result = LivePlayer::new(live).play_running(node, ctx, sink, duration);
        let audio = export
            .join()
            .map_err(|_| PlaybackError::ThreadPanicked("export"))??;
        let sink = live_result?;

        info!(frames = audio.frames(), "export finished");
        Ok(SessionOutput { audio, sink })
    }
}
