//! Violin voice - bowed, singing tone.
//!
//! # How It Works
//!
//! 1. Soft square (30%) layered with saw (70%) for a reedy, bright body
//! 2. Gentle vibrato that settles in over the first second
//! 3. Slow attack (100ms) like a bow starting to bite, long decay into a
//!    high sustain
//! 4. Tanh saturation for rosin grit, then a 2 kHz low-pass
//!
//! Every voice gets its own vibrato rate between 4 and 5 Hz, so a section
//! of voices shimmers instead of wobbling in unison.

use rand::{rngs::StdRng, Rng};

use crate::error::Result;
use crate::graph::{
    distortion::Distortion, envelope::AdsrNode, extensions::NodeExt, filter::BiquadNode,
    node::BoxedNode, oscillator::OscNode, vibrato::VibratoNode,
};
use crate::synth::GraphInstrument;

const RELEASE: f64 = 0.2;

fn voice(rng: &mut StdRng) -> Result<BoxedNode> {
    let phase = rng.gen_range(0.0..1.0);
    let rate = rng.gen_range(4.0..5.0);

    let body = OscNode::soft_square()
        .with_amplitude(0.3)
        .with_phase(phase)
        .mix(OscNode::saw().with_amplitude(0.7).with_phase(phase))?;

    let sound = VibratoNode::new(1.0, 0.01, rate)
        .through(body)?
        .amplify_split(AdsrNode::new(0.1, 1.5, 0.9, RELEASE))?
        .through(Distortion::tanh(3.0))?
        .through(BiquadNode::lowpass(2_000.0, 1.0))?;
    super::finish_voice(sound)
}

pub fn violin() -> GraphInstrument {
    GraphInstrument::with_release(voice, RELEASE)
}
