//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with a uniform contract:
//! fixed arity, per-sample `process`, and explicit stateful or fresh
//! cloning. Combinators check arity when they are built, and the
//! `extensions` module adds fluent helpers so voices can be authored with a
//! clear, chainable API.

/// Shared input, concatenated outputs; wet/dry helper.
pub mod branch;
/// Multi-voice chorus over a modulated delay.
pub mod chorus;
/// Multi-tap delay with per-sample delay times.
pub mod delay;
/// Waveshaping distortion node.
pub mod distortion;
/// Gate-driven envelopes: ADSR and shaped segments.
pub mod envelope;
/// Fluent combinators (`.through()`, `.amplify()`, etc.).
pub mod extensions;
/// Gate-less envelopes over elapsed time.
pub mod fade;
/// Biquad and state-variable filter nodes.
pub mod filter;
/// Multichannel lookahead limiter.
pub mod limiter;
/// Parallel summing and multiplying of two graphs.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// White, pink and brown noise.
pub mod noise;
/// Audio-band oscillators, FM and PWM.
pub mod oscillator;
/// Partial application of constant inputs.
pub mod partial;
/// Parallel-independent stacking and repetition.
pub mod stack;
/// Serial chaining (source → effect) and pipelines.
pub mod through;
/// Glue nodes: constants, pass-through, pan, gain, custom functions.
pub mod util;
/// Frequency vibrato with fade-in.
pub mod vibrato;

pub use branch::{wet_dry, Branch};
pub use chorus::ChorusNode;
pub use delay::ModulatedDelay;
pub use distortion::{Distortion, DistortionShape};
pub use envelope::{AdsrNode, ControlledShapeEnvelope, Envelope, ShapeEnvelope};
pub use extensions::NodeExt;
pub use fade::{FadeCurve, FadeEnvelope};
pub use filter::{BiquadNode, SvfNode, SvfParam};
pub use limiter::LookaheadLimiter;
pub use mix::{Mix, MixOp, Routing};
pub use node::{BoxedNode, GraphNode, RenderCtx};
pub use noise::{NoiseColor, NoiseNode, PinkingNode};
pub use oscillator::{FmOscillator, OscNode, PwmOscillator, PwmShape};
pub use partial::Partial;
pub use stack::{repeat, Stack};
pub use through::{Pipeline, Through};
pub use util::{
    ConstantNode, CustomNode, GainNode, IgnoreInputs, LerpNode, PassNode, SinkNode, StereoPan,
};
pub use vibrato::VibratoNode;
