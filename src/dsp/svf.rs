use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
State Variable Filter (topology-preserving transform)
=====================================================

This is Andrew Simper's trapezoidal SVF. Two integrators (ic1eq, ic2eq)
hold all the state; every response is a different weighted sum of the same
three signals:

  v0 = input
  v1 = bandpass-ish integrator output
  v2 = lowpass-ish integrator output

  output = m0*v0 + m1*v1 + m2*v2

Per sample:

  v3 = v0 - ic2eq
  v1 = a1*ic1eq + a2*v3
  v2 = ic2eq + a2*ic1eq + a3*v3
  ic1eq = 2*v1 - ic1eq
  ic2eq = 2*v2 - ic2eq

Coefficients (g = tan(π·fc/fs), k = 1/Q):

  a1 = 1 / (1 + g(g + k))
  a2 = g * a1
  a3 = g * a2

Mix weights per response:

| shape     | m0  | m1         | m2   | gain |
| --------- | --- | ---------- | ---- | ---- |
| lowpass   | 0   | 0          | 1    |      |
| highpass  | 1   | -k         | -1   |      |
| bandpass  | 0   | 1          | 0    |      |
| notch     | 1   | -k         | 0    |      |
| peak      | 1   | -k         | -2   |      |
| allpass   | 1   | -2k        | 0    |      |
| bell      | 1   | k(A²-1)    | 0    | yes  |
| lowshelf  | 1   | k(A-1)     | A²-1 | yes  |
| highshelf | A²  | k(1-A)A    | 1-A² | yes  |

where A = sqrt(gain) for the gain-bearing shapes. The bell also widens k to
1/(Q·A); the shelves move g by a factor of sqrt(A).

Computing `tan` per sample is expensive, so the node caches the last
parameter triple and only redesigns when cutoff, Q or gain actually change.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvfShape {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
    Peak,
    Allpass,
    Bell,
    LowShelf,
    HighShelf,
}

impl SvfShape {
    pub const ALL: [SvfShape; 9] = [
        SvfShape::Lowpass,
        SvfShape::Highpass,
        SvfShape::Bandpass,
        SvfShape::Notch,
        SvfShape::Peak,
        SvfShape::Allpass,
        SvfShape::Bell,
        SvfShape::LowShelf,
        SvfShape::HighShelf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SvfShape::Lowpass => "lowpass",
            SvfShape::Highpass => "highpass",
            SvfShape::Bandpass => "bandpass",
            SvfShape::Notch => "notch",
            SvfShape::Peak => "peak",
            SvfShape::Allpass => "allpass",
            SvfShape::Bell => "bell",
            SvfShape::LowShelf => "lowshelf",
            SvfShape::HighShelf => "highshelf",
        }
    }

    pub fn has_gain(self) -> bool {
        matches!(self, SvfShape::Bell | SvfShape::LowShelf | SvfShape::HighShelf)
    }
}

/// Parameters the coefficients depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfParams {
    pub sample_rate: f64,
    pub cutoff: f64,
    pub q: f64,
    /// Linear gain, only read by gain-bearing shapes.
    pub gain: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfCoefficients {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub m0: f64,
    pub m1: f64,
    pub m2: f64,
}

impl SvfCoefficients {
    fn from_gk(g: f64, k: f64, m0: f64, m1: f64, m2: f64) -> Self {
        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        let a3 = g * a2;
        Self {
            a1,
            a2,
            a3,
            m0,
            m1,
            m2,
        }
    }

    pub fn design(shape: SvfShape, p: &SvfParams) -> Self {
        let g = (PI * p.cutoff / p.sample_rate).tan();
        let k = 1.0 / p.q;
        let a = p.gain.sqrt();

        match shape {
            SvfShape::Lowpass => Self::from_gk(g, k, 0.0, 0.0, 1.0),
            SvfShape::Highpass => Self::from_gk(g, k, 1.0, -k, -1.0),
            SvfShape::Bandpass => Self::from_gk(g, k, 0.0, 1.0, 0.0),
            SvfShape::Notch => Self::from_gk(g, k, 1.0, -k, 0.0),
            SvfShape::Peak => Self::from_gk(g, k, 1.0, -k, -2.0),
            SvfShape::Allpass => Self::from_gk(g, k, 1.0, -2.0 * k, 0.0),
            SvfShape::Bell => {
                let k = 1.0 / (p.q * a);
                Self::from_gk(g, k, 1.0, k * (a * a - 1.0), 0.0)
            }
            SvfShape::LowShelf => {
                let g = g / a.sqrt();
                Self::from_gk(g, k, 1.0, k * (a - 1.0), a * a - 1.0)
            }
            SvfShape::HighShelf => {
                let g = g * a.sqrt();
                Self::from_gk(g, k, a * a, k * (1.0 - a) * a, 1.0 - a * a)
            }
        }
    }
}

/// Integrator state of one SVF.
#[derive(Debug, Clone, Default)]
pub struct SvfState {
    ic1eq: f64,
    ic2eq: f64,
}

impl SvfState {
    #[inline]
    pub fn process(&mut self, c: &SvfCoefficients, input: f32) -> f32 {
        let v0 = input as f64;
        let v3 = v0 - self.ic2eq;
        let v1 = c.a1 * self.ic1eq + c.a2 * v3;
        let v2 = self.ic2eq + c.a2 * self.ic1eq + c.a3 * v3;
        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        (c.m0 * v0 + c.m1 * v1 + c.m2 * v2) as f32
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(cutoff: f64) -> SvfParams {
        SvfParams {
            sample_rate: 48_000.0,
            cutoff,
            q: 0.707,
            gain: 1.0,
        }
    }

    fn settle(shape: SvfShape, p: &SvfParams, input: f32) -> f32 {
        let c = SvfCoefficients::design(shape, p);
        let mut state = SvfState::default();
        let mut y = 0.0;
        for _ in 0..20_000 {
            y = state.process(&c, input);
        }
        y
    }

    #[test]
    fn lowpass_passes_dc() {
        let y = settle(SvfShape::Lowpass, &params(1_000.0), 1.0);
        assert!((y - 1.0).abs() < 1e-4, "lowpass DC = {}", y);
    }

    #[test]
    fn lowpass_rejects_nyquist() {
        let c = SvfCoefficients::design(SvfShape::Lowpass, &params(200.0));
        let mut state = SvfState::default();
        let mut peak = 0.0f32;
        for n in 0..4_000 {
            let x = if n % 2 == 0 { 1.0 } else { -1.0 };
            let y = state.process(&c, x);
            if n >= 2_000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.01, "lowpass nyquist peak = {}", peak);
    }

    #[test]
    fn lowpass_attenuates_ten_times_cutoff() {
        // 12 dB/octave: about -40 dB a decade above the cutoff
        let c = SvfCoefficients::design(SvfShape::Lowpass, &params(500.0));
        let mut state = SvfState::default();
        let mut peak = 0.0f32;
        for n in 0..9_600 {
            let x = (2.0 * PI * 5_000.0 * n as f64 / 48_000.0).sin() as f32;
            let y = state.process(&c, x);
            if n >= 4_800 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.02, "lowpass at 10x cutoff peak = {}", peak);
    }

    #[test]
    fn highpass_and_bandpass_block_dc() {
        for shape in [SvfShape::Highpass, SvfShape::Bandpass] {
            let y = settle(shape, &params(1_000.0), 1.0);
            assert!(y.abs() < 1e-4, "{:?} leaked {}", shape, y);
        }
    }

    #[test]
    fn unity_gain_shapes_are_transparent_at_dc() {
        for shape in [SvfShape::Bell, SvfShape::LowShelf, SvfShape::HighShelf] {
            let y = settle(shape, &params(1_000.0), 1.0);
            assert!((y - 1.0).abs() < 1e-4, "{:?} at unity gain = {}", shape, y);
        }
    }

    #[test]
    fn lowshelf_scales_dc_by_gain() {
        let mut p = params(500.0);
        p.gain = 4.0;
        let y = settle(SvfShape::LowShelf, &p, 1.0);
        assert!((y - 4.0).abs() < 1e-3, "lowshelf DC = {}", y);
    }
}
