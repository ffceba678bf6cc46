//! Organ voice - drawbar-style additive tone.
//!
//! # How It Works
//!
//! 1. Sine partials at the fundamental, octave and twelfth, like three
//!    drawbars pulled out to decreasing levels
//! 2. Near-instant attack and release: an organ pipe speaks or it doesn't
//! 3. Full sustain for as long as the key is held
//!
//! The octave partial gets its own short key-click envelope on top of the
//! ADSR: a jump to 1.6 that settles back to 1.0 within 60ms.

use crate::dsp::envelope::{Shape, ShapeSection};
use crate::dsp::waveshape::Waveform;
use crate::synth::{EnvelopeSpec, SimpleSynth, WaveComponent, WaveSource};

pub fn organ() -> SimpleSynth {
    let hold = EnvelopeSpec::adsr(0.005, 0.05, 1.0, 0.08);
    let click = EnvelopeSpec::Controlled {
        attack: Shape::new(vec![
            ShapeSection::linear(1.6, 0.0),
            ShapeSection::new(1.0, 0.06, 0.5),
        ]),
        release: Some(Shape::new(vec![ShapeSection::linear(1.0, 0.08)])),
    };

    let drawbar = |factor: f64, level: f32| {
        WaveComponent::new(WaveSource::simple(Waveform::Sine, level))
            .with_frequency(factor, 0.0)
            .with_envelope(hold.clone())
    };

    SimpleSynth::new(
        0.002,
        vec![
            drawbar(1.0, 0.45),
            drawbar(2.0, 0.25).with_envelope(click),
            drawbar(3.0, 0.15),
        ],
    )
}
