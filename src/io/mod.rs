// Purpose - format conversions at the edge of the engine

pub mod pcm;

pub use pcm::{convert_into, interleave_into, sample_to_i16};
