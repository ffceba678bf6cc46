pub mod dsp; // Allocation-free signal math
pub mod engine; // Mixer and offline renderer
pub mod error;
pub mod graph; // Composable signal graph nodes
pub mod io; // PCM conversion
pub mod runtime; // Live playback and concurrent export
pub mod sequencing; // Notes, tempo map, song timeline
pub mod synth; // Voice pool and instruments
pub mod voices; // Preset instruments

pub use engine::{Mixer, OfflineRenderer, RenderConfig, RenderedAudio};
pub use error::{GraphError, PlaybackError};
pub use graph::node::{BoxedNode, GraphNode, RenderCtx};
pub use sequencing::{Note, NoteFilter, Song, TempoTrack, Track};
pub use synth::{Instrument, InstrumentPlayer};

/// Sample rate used when nothing else is configured.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Frames per block written to a live output device.
pub const LIVE_BLOCK_FRAMES: usize = 1024;
