//! Piano voice - struck, decaying tone.
//!
//! A piano note is loudest at the hammer strike and fades even while the
//! key is held. There is no real sustain level, only a long decay.
//!
//! # How It Works
//!
//! 1. Soft saw gives a full harmonic series without the saw's harsh edge
//! 2. Fast attack (20ms), one second of decay down to a low sustain
//! 3. Velocity scales the level, doubled to make up for the quiet tail
//! 4. Low-pass at 2 kHz takes the buzz off the top
//!
//! # Variations
//!
//! - Lower cutoff = felt piano
//! - Square + sine layer instead of soft saw = toy piano
//! - Shorter decay = harpsichord-ish pluck

use rand::rngs::StdRng;

use crate::error::Result;
use crate::graph::{
    envelope::AdsrNode, extensions::NodeExt, filter::BiquadNode, node::BoxedNode,
    oscillator::OscNode,
};
use crate::synth::GraphInstrument;

const RELEASE: f64 = 0.5;

fn voice(_rng: &mut StdRng) -> Result<BoxedNode> {
    let sound = OscNode::soft_saw()
        .amplify_split(AdsrNode::new(0.02, 1.0, 0.1, RELEASE))?
        .scaled(2.0)?
        .through(BiquadNode::lowpass(2_000.0, 1.0))?;
    super::finish_voice(sound)
}

pub fn piano() -> GraphInstrument {
    GraphInstrument::with_release(voice, RELEASE)
}
