use crate::dsp::waveshape::{sine, triangle, wrap_phase, Waveform};
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/*
Audio Oscillator
================

An oscillator is the fundamental sound source: a phase accumulator that
wraps around [0, 1) and a waveshape that turns phase into a sample.

  phase += frequency * time_step      (every sample)
  phase  = phase mod 1
  output = shape(phase) * amplitude

Frequency is an INPUT, not a setting. The voice graph feeds the note
frequency in every sample, which makes vibrato and FM a matter of wiring
another node in front of the oscillator:

  freq ──→ [Vibrato] ──→ [OscNode] ──→ sample

Waveforms and Their Character:
------------------------------

Sine:        Pure tone, fundamental only. Flutes, sub-bass.
Square:      Odd harmonics. Hollow, woody.
Pulse(d):    Square with adjustable duty cycle. Nasal as d moves from 0.5.
Triangle:    Odd harmonics falling as 1/n². Soft, mellow.
Saw:         All harmonics. Bright, buzzy, brassy.
SoftSaw:     Saw with its discontinuity rounded off. Piano-ish body.
SoftSquare:  Square with rounded edges. Reedy, used for violin layers.

Initial phase:
--------------
Each oscillator carries a configured initial phase. `reset()` restores it
rather than zero, so a voice that was built with a random phase offset
sounds the same every time the player recycles it.

Example usage:
  let osc = OscNode::new(Waveform::Saw, 1.0, 0.0);
  let voice = osc.amplify_split(AdsrNode::new(0.01, 0.2, 0.6, 0.3))?;  // [freq, gate]

FmOscillator and PwmOscillator take a second input that drives their
modulator (see below).
*/

#[derive(Debug, Clone)]
pub struct OscNode {
    waveform: Waveform,
    amplitude: f32,
    initial_phase: f64,
    phase: f64,
}

impl OscNode {
    pub fn new(waveform: Waveform, amplitude: f32, initial_phase: f64) -> Self {
        let initial_phase = wrap_phase(initial_phase);
        Self {
            waveform,
            amplitude,
            initial_phase,
            phase: initial_phase,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine, 1.0, 0.0)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square, 1.0, 0.0)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle, 1.0, 0.0)
    }

    pub fn saw() -> Self {
        Self::new(Waveform::Saw, 1.0, 0.0)
    }

    pub fn pulse(duty: f64) -> Self {
        Self::new(Waveform::Pulse { duty }, 1.0, 0.0)
    }

    pub fn soft_saw() -> Self {
        Self::new(Waveform::SoftSaw, 1.0, 0.0)
    }

    pub fn soft_square() -> Self {
        Self::new(Waveform::SoftSquare, 1.0, 0.0)
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.initial_phase = wrap_phase(phase);
        self.phase = self.initial_phase;
        self
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}

impl GraphNode for OscNode {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        self.phase = wrap_phase(self.phase + inputs[0] as f64 * ctx.time_step());
        outputs[0] = self.waveform.sample(self.phase) as f32 * self.amplitude;
    }

    fn reset(&mut self) {
        self.phase = self.initial_phase;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        let mut fresh = self.clone();
        fresh.reset();
        Box::new(fresh)
    }
}

/// Two-operator FM: `[carrier_hz, modulator_ratio] -> sample`.
///
/// The modulator runs at `carrier_hz * modulator_ratio` and shifts the
/// carrier phase by `sin(mod_phase) * index / 2π`.
#[derive(Debug, Clone)]
pub struct FmOscillator {
    amplitude: f32,
    index: f64,
    carrier_phase: f64,
    modulator_phase: f64,
}

impl FmOscillator {
    pub fn new(amplitude: f32, index: f64) -> Self {
        Self {
            amplitude,
            index,
            carrier_phase: 0.0,
            modulator_phase: 0.0,
        }
    }
}

impl GraphNode for FmOscillator {
    fn input_count(&self) -> usize {
        2
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let carrier_hz = inputs[0] as f64;
        let ratio = inputs[1] as f64;
        let dt = ctx.time_step();

        self.modulator_phase = wrap_phase(self.modulator_phase + carrier_hz * ratio * dt);
        self.carrier_phase = wrap_phase(self.carrier_phase + carrier_hz * dt);

        let offset = sine(self.modulator_phase) * self.index / std::f64::consts::TAU;
        outputs[0] = sine(self.carrier_phase + offset) as f32 * self.amplitude;
    }

    fn reset(&mut self) {
        self.carrier_phase = 0.0;
        self.modulator_phase = 0.0;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(self.amplitude, self.index))
    }
}

/// Shape of the duty-cycle modulator of a [`PwmOscillator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PwmShape {
    Sine,
    Triangle,
}

/// Pulse wave with a moving duty cycle: `[carrier_hz, modulator_hz] -> sample`.
///
/// `duty = 0.5 + 0.5 * shape(mod_phase) * amount`
#[derive(Debug, Clone)]
pub struct PwmOscillator {
    shape: PwmShape,
    amount: f64,
    amplitude: f32,
    carrier_phase: f64,
    modulator_phase: f64,
}

impl PwmOscillator {
    pub fn new(shape: PwmShape, amount: f64, amplitude: f32) -> Self {
        Self {
            shape,
            amount,
            amplitude,
            carrier_phase: 0.0,
            modulator_phase: 0.0,
        }
    }
}

impl GraphNode for PwmOscillator {
    fn input_count(&self) -> usize {
        2
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let dt = ctx.time_step();
        self.carrier_phase = wrap_phase(self.carrier_phase + inputs[0] as f64 * dt);
        self.modulator_phase = wrap_phase(self.modulator_phase + inputs[1] as f64 * dt);

        let modulation = match self.shape {
            PwmShape::Sine => sine(self.modulator_phase),
            PwmShape::Triangle => triangle(self.modulator_phase),
        };
        let duty = 0.5 + 0.5 * modulation * self.amount;
        let value = if self.carrier_phase < duty { 1.0 } else { -1.0 };
        outputs[0] = value * self.amplitude;
    }

    fn reset(&mut self) {
        self.carrier_phase = 0.0;
        self.modulator_phase = 0.0;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(self.shape, self.amount, self.amplitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: &mut dyn GraphNode, inputs: &[f32], samples: usize) -> Vec<f32> {
        let mut ctx = RenderCtx::new(48_000, 0);
        node.init(&mut ctx);
        let mut out = [0.0];
        (0..samples)
            .map(|_| {
                node.process(&ctx, inputs, &mut out);
                ctx.tick();
                out[0]
            })
            .collect()
    }

    #[test]
    fn sine_completes_one_cycle_per_period() {
        let mut osc = OscNode::sine();
        // 480 Hz at 48 kHz: 100 samples per cycle
        let samples = render(&mut osc, &[480.0], 100);
        assert!(samples[99].abs() < 1e-4, "phase should wrap to 0: {}", samples[99]);
        assert!((samples[24] - 1.0).abs() < 1e-4, "quarter cycle peak: {}", samples[24]);
    }

    #[test]
    fn reset_restores_configured_phase() {
        let mut osc = OscNode::triangle().with_phase(0.3);
        let first = render(&mut osc, &[440.0], 64);
        osc.reset();
        assert!((osc.phase() - 0.3).abs() < 1e-12);
        let second = render(&mut osc, &[440.0], 64);
        assert_eq!(first, second);
    }

    #[test]
    fn clone_fresh_starts_over_and_clone_state_continues() {
        let mut osc = OscNode::saw().with_phase(0.1);
        render(&mut osc, &[220.0], 50);

        let mut fresh = osc.clone_fresh();
        let mut resumed = osc.clone_state();
        let mut brand_new = OscNode::saw().with_phase(0.1);

        assert_eq!(render(&mut *fresh, &[220.0], 32), render(&mut brand_new, &[220.0], 32));
        assert_eq!(render(&mut *resumed, &[220.0], 32), render(&mut osc, &[220.0], 32));
    }

    #[test]
    fn amplitude_scales_output() {
        let mut osc = OscNode::square().with_amplitude(0.25);
        for s in render(&mut osc, &[100.0], 200) {
            assert!((s.abs() - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn fm_with_zero_index_is_a_sine() {
        let mut fm = FmOscillator::new(1.0, 0.0);
        let mut osc = OscNode::sine();
        let a = render(&mut fm, &[300.0, 2.0], 128);
        let b = render(&mut osc, &[300.0], 128);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn pwm_outputs_plus_minus_amplitude() {
        let mut pwm = PwmOscillator::new(PwmShape::Triangle, 0.8, 0.5);
        let samples = render(&mut pwm, &[110.0, 3.0], 2_000);
        assert!(samples.iter().all(|s| (s.abs() - 0.5).abs() < 1e-6));
        assert!(samples.iter().any(|&s| s > 0.0) && samples.iter().any(|&s| s < 0.0));
    }
}
