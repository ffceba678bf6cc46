use std::sync::Arc;

use rand::rngs::StdRng;

use crate::error::Result;
use crate::graph::node::BoxedNode;

/// Builds one voice graph for an instrument.
///
/// This is the "instrument design" layer: you describe the sound once, and
/// the player asks the factory for as many identical voices as it needs.
/// Voices must take `[frequency, gate, velocity, random]` and produce a
/// stereo pair.
///
/// Per-voice variation (random phase, vibrato rate) is drawn from the
/// generator passed in. The player seeds that generator, so the same seed
/// always builds the same set of voices.
pub trait VoiceFactory: Send + Sync {
    fn create_voice(&self, rng: &mut StdRng) -> Result<BoxedNode>;
}

impl<F> VoiceFactory for F
where
    F: Fn(&mut StdRng) -> Result<BoxedNode> + Send + Sync,
{
    fn create_voice(&self, rng: &mut StdRng) -> Result<BoxedNode> {
        self(rng)
    }
}

pub type SharedFactory = Arc<dyn VoiceFactory>;

/// Seconds of release tail for a note whose gate fell `release_moment`
/// seconds after it started.
pub type ReleaseEvaluator = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Evaluator for voices that fall silent the moment their gate drops.
pub fn no_release() -> ReleaseEvaluator {
    Arc::new(|_| 0.0)
}

/// Evaluator returning the same tail for every note.
pub fn fixed_release(seconds: f64) -> ReleaseEvaluator {
    Arc::new(move |_| seconds)
}
