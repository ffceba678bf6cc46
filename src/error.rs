//! Error types.
//!
//! Graph construction is validated eagerly: every combinator checks arity when
//! it is built and reports a [`GraphError`] instead of failing mid-render.
//! Nothing on the per-sample path returns an error.

use thiserror::Error;

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("{combinator}: expected {expected} channels, found {found}")]
    ArityMismatch {
        combinator: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("voice count must be greater than zero")]
    InvalidVoiceCount,

    #[error("voice graph must take 4 inputs and produce 2 outputs, got {inputs} -> {outputs}")]
    VoiceArity { inputs: usize, outputs: usize },

    #[error("{shape} filter requires a gain value")]
    MissingGain { shape: &'static str },

    #[error("{shape} filter does not take a gain value")]
    UnexpectedGain { shape: &'static str },

    #[error("input index {index} is out of range for a node with {inputs} inputs")]
    InvalidInputIndex { index: usize, inputs: usize },

    #[error("pipeline needs at least one node")]
    EmptyPipeline,

    #[error("repeat count must be at least 1")]
    ZeroRepeat,

    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("note filter selects track {index}, but the song has {tracks} tracks")]
    UnknownTrack { index: usize, tracks: usize },

    #[error("expected a stereo source (0 inputs, 2 outputs), got {inputs} -> {outputs}")]
    SourceArity { inputs: usize, outputs: usize },

    #[error("renderer needs a node without inputs, got one with {inputs}")]
    NotASource { inputs: usize },
}

impl GraphError {
    pub(crate) fn arity(combinator: &'static str, expected: usize, found: usize) -> Self {
        GraphError::ArityMismatch {
            combinator,
            expected,
            found,
        }
    }
}

/// Failures on the live playback path.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no output device available")]
    NoDevice,

    #[error("audio device error: {0}")]
    Device(String),

    #[error("failed to build output stream: {0}")]
    StreamBuild(String),

    #[error("failed to start output stream: {0}")]
    StreamPlay(String),

    #[error("failed to spawn {0} thread: {1}")]
    Spawn(&'static str, #[source] std::io::Error),

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
