//! Real-world scenario benchmarks.
//!
//! Complete preset voices and polyphonic players rendering a short song,
//! the way the command-line renderer drives them.

mod mix;
mod voices;

pub use mix::bench_mix;
pub use voices::bench_voices;
