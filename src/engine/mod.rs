// Purpose: Song-level mixing and batch rendering
// Sits above the synth layer: players go into the mixer, the mixer into a renderer

pub mod mixer;
pub mod renderer;

pub use mixer::Mixer;
pub use renderer::{OfflineRenderer, RenderConfig, RenderedAudio};
