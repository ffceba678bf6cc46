//! Pre-built instruments for common sounds.
//!
//! Each preset is an [`Instrument`]: hand it to
//! [`InstrumentPlayer::for_instrument`](crate::synth::InstrumentPlayer::for_instrument)
//! together with a song. Use these as starting points for your own sounds,
//! or study them to learn how different timbres are built.
//!
//! Flute, piano and violin are wired by hand with the graph algebra. Organ
//! and pad are described as data with [`SimpleSynth`](crate::synth::SimpleSynth).
//!
//! # Example
//!
//! ```ignore
//! use polytone::voices;
//!
//! let piano = voices::piano();
//! let pad = voices::by_name("pad").unwrap();
//! ```

use crate::error::Result;
use crate::graph::{
    extensions::NodeExt,
    node::{BoxedNode, GraphNode},
    util::{CustomNode, PassNode, SinkNode},
};
use crate::synth::Instrument;

mod flute;
mod organ;
mod pad;
mod piano;
mod violin;

pub use flute::flute;
pub use organ::organ;
pub use pad::pad;
pub use piano::piano;
pub use violin::violin;

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 5] = ["flute", "organ", "pad", "piano", "violin"];

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<Box<dyn Instrument>> {
    let instrument: Box<dyn Instrument> = match name {
        "flute" => Box::new(flute()),
        "organ" => Box::new(organ()),
        "pad" => Box::new(pad()),
        "piano" => Box::new(piano()),
        "violin" => Box::new(violin()),
        _ => return None,
    };
    Some(instrument)
}

/// Turn a mono `[frequency, gate] -> sample` graph into a full voice:
/// scale by velocity, ignore the random input, duplicate to stereo.
fn finish_voice<N: GraphNode + 'static>(sound: N) -> Result<BoxedNode> {
    Ok(sound
        .amplify_split(PassNode::new(1))?
        .beside(SinkNode::new(1))
        .through(CustomNode::duplicate(1))?
        .boxed())
}
