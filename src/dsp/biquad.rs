use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Biquad Filter (RBJ cookbook)
============================

A biquad is a second-order IIR filter: two poles and two zeros. It is the
standard building block for EQ bands and simple tone shaping.

Difference equation (a0 normalised to 1):

  y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]

The state is the last two inputs and the last two outputs, which keeps the
filter well behaved when coefficients are swapped between blocks.

Coefficients (w = 2π·f/fs, alpha = sin(w)/(2Q), beta = cos(w)):

| shape    | b0            | b1          | b2            | a1       | a2         |
| -------- | ------------- | ----------- | ------------- | -------- | ---------- |
| lowpass  | (1-beta)/2    | 1-beta      | (1-beta)/2    | -2beta   | 1-alpha    |
| highpass | (1+beta)/2    | -(1+beta)   | (1+beta)/2    | -2beta   | 1-alpha    |
| bandpass | alpha         | 0           | -alpha        | -2beta   | 1-alpha    |
| notch    | 1             | -2beta      | 1             | -2beta   | 1-alpha    |
| bell     | 1+alpha*A     | -2beta      | 1-alpha*A     | -2beta   | 1-alpha/A  |

All rows are divided by a0 = 1+alpha (bell: 1+alpha/A, with A = 10^(dB/40)).

DC gain of the lowpass is exactly 1: at w = 0 the numerator sum equals the
denominator sum.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadShape {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
    /// Peaking EQ, gain in decibels.
    Bell,
}

impl BiquadShape {
    pub fn name(self) -> &'static str {
        match self {
            BiquadShape::Lowpass => "lowpass",
            BiquadShape::Highpass => "highpass",
            BiquadShape::Bandpass => "bandpass",
            BiquadShape::Notch => "notch",
            BiquadShape::Bell => "bell",
        }
    }

    pub fn has_gain(self) -> bool {
        matches!(self, BiquadShape::Bell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

struct Prewarp {
    alpha: f64,
    beta: f64,
}

fn prewarp(sample_rate: f64, cutoff: f64, q: f64) -> Prewarp {
    let omega = 2.0 * PI * cutoff / sample_rate;
    Prewarp {
        alpha: omega.sin() / (2.0 * q),
        beta: omega.cos(),
    }
}

impl BiquadCoefficients {
    /// Pass-through filter.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    pub fn design(shape: BiquadShape, sample_rate: f64, cutoff: f64, q: f64, gain_db: f64) -> Self {
        match shape {
            BiquadShape::Lowpass => Self::lowpass(sample_rate, cutoff, q),
            BiquadShape::Highpass => Self::highpass(sample_rate, cutoff, q),
            BiquadShape::Bandpass => Self::bandpass(sample_rate, cutoff, q),
            BiquadShape::Notch => Self::notch(sample_rate, cutoff, q),
            BiquadShape::Bell => Self::bell(sample_rate, cutoff, q, gain_db),
        }
    }

    pub fn lowpass(sample_rate: f64, cutoff: f64, q: f64) -> Self {
        let Prewarp { alpha, beta } = prewarp(sample_rate, cutoff, q);
        let a0r = 1.0 / (1.0 + alpha);
        Self {
            b0: (1.0 - beta) * 0.5 * a0r,
            b1: (1.0 - beta) * a0r,
            b2: (1.0 - beta) * 0.5 * a0r,
            a1: -2.0 * beta * a0r,
            a2: (1.0 - alpha) * a0r,
        }
    }

    pub fn highpass(sample_rate: f64, cutoff: f64, q: f64) -> Self {
        let Prewarp { alpha, beta } = prewarp(sample_rate, cutoff, q);
        let a0r = 1.0 / (1.0 + alpha);
        Self {
            b0: (1.0 + beta) * 0.5 * a0r,
            b1: -(1.0 + beta) * a0r,
            b2: (1.0 + beta) * 0.5 * a0r,
            a1: -2.0 * beta * a0r,
            a2: (1.0 - alpha) * a0r,
        }
    }

    pub fn bandpass(sample_rate: f64, center: f64, q: f64) -> Self {
        let Prewarp { alpha, beta } = prewarp(sample_rate, center, q);
        let a0r = 1.0 / (1.0 + alpha);
        Self {
            b0: alpha * a0r,
            b1: 0.0,
            b2: -alpha * a0r,
            a1: -2.0 * beta * a0r,
            a2: (1.0 - alpha) * a0r,
        }
    }

    pub fn notch(sample_rate: f64, center: f64, q: f64) -> Self {
        let Prewarp { alpha, beta } = prewarp(sample_rate, center, q);
        let a0r = 1.0 / (1.0 + alpha);
        Self {
            b0: a0r,
            b1: -2.0 * beta * a0r,
            b2: a0r,
            a1: -2.0 * beta * a0r,
            a2: (1.0 - alpha) * a0r,
        }
    }

    pub fn bell(sample_rate: f64, center: f64, q: f64, gain_db: f64) -> Self {
        let Prewarp { alpha, beta } = prewarp(sample_rate, center, q);
        let a = 10f64.powf(gain_db / 40.0);
        let a0 = 1.0 + alpha / a;
        Self {
            b0: (1.0 + alpha * a) / a0,
            b1: -2.0 * beta / a0,
            b2: (1.0 - alpha * a) / a0,
            a1: -2.0 * beta / a0,
            a2: (1.0 - alpha / a) / a0,
        }
    }
}

/// Two-sample input/output history for one biquad section.
#[derive(Debug, Clone, Default)]
pub struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    #[inline]
    pub fn process(&mut self, c: &BiquadCoefficients, input: f32) -> f32 {
        let x0 = input as f64;
        let y0 = c.b0 * x0 + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;

        y0 as f32
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
