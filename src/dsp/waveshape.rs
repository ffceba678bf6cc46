use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Waveshapes
==========

Every shape maps a phase t in [0, 1) to a value in [-1, 1]:

  Sine        sin(2πt)
  Square      +1 for t < 0.5, else -1
  Pulse(d)    +1 for t < d, else -1
  Triangle    4t            for t < 0.25
              2 - 4t        for t < 0.75
              4t - 4        otherwise
  Saw         1 - 2t        (falling ramp)
  SoftSaw     s(1 - s^12)   with s = 1 - 2t
  SoftSquare  0.66·atan(14·cos((4t - 1)·π/2))

The soft variants round off the discontinuities of saw and square, which
takes the edge off the aliasing without a band-limited oscillator.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
    Pulse { duty: f64 },
    Triangle,
    Saw,
    SoftSaw,
    SoftSquare,
}

impl Waveform {
    #[inline]
    pub fn sample(self, t: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * t).sin(),
            Waveform::Square => {
                if t < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Pulse { duty } => {
                if t < duty {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => triangle(t),
            Waveform::Saw => 1.0 - 2.0 * t,
            Waveform::SoftSaw => {
                let s = 1.0 - 2.0 * t;
                s * (1.0 - s.powi(12))
            }
            Waveform::SoftSquare => 0.66 * (14.0 * ((4.0 * t - 1.0) * PI * 0.5).cos()).atan(),
        }
    }
}

#[inline]
pub fn triangle(t: f64) -> f64 {
    if t < 0.25 {
        4.0 * t
    } else if t < 0.75 {
        2.0 - 4.0 * t
    } else {
        -4.0 + 4.0 * t
    }
}

#[inline]
pub fn sine(t: f64) -> f64 {
    (2.0 * PI * t).sin()
}

/// Wrap a phase into [0, 1).
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase - phase.floor();
    // floor can round a tiny negative up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
