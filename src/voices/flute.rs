//! Flute voice - breathy, pure tone.
//!
//! # How It Works
//!
//! 1. Mostly sine (60%) with some triangle (40%) for a little body
//! 2. Vibrato a touch wider than the violin's
//! 3. ADSR with a quick attack and high sustain
//! 4. A light three-voice chorus thickens it into an airy ensemble
//!
//! # Variations
//!
//! - Add a pink noise component = more breath
//! - Remove the chorus = solo recorder

use rand::{rngs::StdRng, Rng};

use crate::error::Result;
use crate::graph::{
    chorus::ChorusNode, envelope::AdsrNode, extensions::NodeExt, node::BoxedNode,
    oscillator::OscNode, vibrato::VibratoNode,
};
use crate::synth::GraphInstrument;

const RELEASE: f64 = 0.5;

fn voice(rng: &mut StdRng) -> Result<BoxedNode> {
    let phase = rng.gen_range(0.0..1.0);
    let rate = rng.gen_range(4.0..5.0);

    let tone = OscNode::triangle()
        .with_amplitude(0.4)
        .with_phase(phase)
        .mix(OscNode::sine().with_amplitude(0.6).with_phase(phase))?;

    let sound = VibratoNode::new(1.0, 0.015, rate)
        .through(tone)?
        .amplify_split(AdsrNode::new(0.05, 0.5, 0.9, RELEASE))?
        .through(ChorusNode::new(3, 0.01, 0.003, 0.2, 0.3))?;
    super::finish_voice(sound)
}

pub fn flute() -> GraphInstrument {
    GraphInstrument::with_release(voice, RELEASE)
}
