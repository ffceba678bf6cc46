//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free once constructed, which makes them
//! safe to embed directly inside voice graphs. They stay focused on the
//! signal-processing math so graph nodes can layer on arity, cloning and
//! lifecycle handling.

/// RBJ cookbook biquad coefficients and filter state.
pub mod biquad;
/// Circular delay line with cubic fractional reads.
pub mod delay;
/// Waveshaping transfer functions.
pub mod distortion;
/// ADSR and shaped-segment envelope state machines.
pub mod envelope;
/// Hermite, linear and exponential interpolation.
pub mod interpolate;
/// One-pole cascade that turns white noise pink.
pub mod pinking;
/// Topology-preserving state-variable filter.
pub mod svf;
/// Phase-to-sample oscillator shapes.
pub mod waveshape;

pub use envelope::AdsrStage;
