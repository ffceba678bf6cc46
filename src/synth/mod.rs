// Purpose: Voice pool, polyphonic note playback, instruments
// This layer sits above graph nodes and turns a song into voices

pub mod effects;
pub mod factory;
pub mod instrument;
pub mod player;
pub mod pool;
pub mod simple;

pub use effects::{apply_effects, EffectSpec};
pub use factory::{fixed_release, no_release, ReleaseEvaluator, SharedFactory, VoiceFactory};
pub use instrument::{GraphInstrument, Instrument};
pub use player::{InstrumentPlayer, VoiceData};
pub use pool::FreeList;
pub use simple::{EnvelopeSpec, SimpleSynth, WaveComponent, WaveSource};
