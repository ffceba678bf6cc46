//! Pad voice - sustained, atmospheric texture.
//!
//! Pads are the foundation of ambient and atmospheric music. They provide
//! a lush, evolving backdrop that fills sonic space without demanding attention.
//!
//! # How It Works
//!
//! 1. Two sawtooth partials detuned by about 8 cents create width and movement
//! 2. A quiet pulse an octave down adds weight
//! 3. A breath of pink noise under everything
//! 4. Slow eased swell (400ms) in, long fade (800ms) out
//! 5. Each note is detuned by up to ±4 cents from the player's random input,
//!    so a held chord drifts slightly apart
//!
//! # Variations
//!
//! - More detune (20+ cents) = wider, more dramatic
//! - Less detune (5 cents) = subtle, cohesive
//! - Follow with `effects::lowpass` = darker, more ambient

use crate::dsp::envelope::{Shape, ShapeSection};
use crate::dsp::waveshape::Waveform;
use crate::graph::noise::NoiseColor;
use crate::synth::{EnvelopeSpec, SimpleSynth, WaveComponent, WaveSource};

/// 2^(8/1200)
const DETUNE: f64 = 1.004_63;

pub fn pad() -> SimpleSynth {
    let swell = EnvelopeSpec::Controlled {
        attack: Shape::new(vec![ShapeSection::new(1.0, 0.4, 2.0)]),
        release: Some(Shape::new(vec![ShapeSection::new(0.0, 0.8, 0.5)])),
    };

    let layer = |source: WaveSource, factor: f64| {
        WaveComponent::new(source)
            .with_frequency(factor, 0.0)
            .with_envelope(swell.clone())
    };

    SimpleSynth::new(
        0.004,
        vec![
            layer(WaveSource::simple(Waveform::Saw, 0.3), 1.0),
            layer(WaveSource::simple(Waveform::Saw, 0.3), DETUNE),
            layer(WaveSource::simple(Waveform::Pulse { duty: 0.3 }, 0.12), 0.5),
            layer(
                WaveSource::Noise {
                    color: NoiseColor::Pink,
                    amplitude: 0.02,
                },
                1.0,
            ),
        ],
    )
    .with_detune(4.0)
}
