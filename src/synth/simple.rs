use std::sync::Arc;

use rand::{rngs::StdRng, Rng};

use crate::dsp::envelope::{AdsrParams, Shape};
use crate::dsp::waveshape::Waveform;
use crate::error::Result;
use crate::graph::envelope::{AdsrNode, ControlledShapeEnvelope, ShapeEnvelope};
use crate::graph::extensions::NodeExt;
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};
use crate::graph::noise::{NoiseColor, NoiseNode};
use crate::graph::oscillator::{FmOscillator, OscNode, PwmOscillator, PwmShape};
use crate::graph::util::IgnoreInputs;
use crate::graph::vibrato::VibratoNode;
use crate::synth::factory::{ReleaseEvaluator, SharedFactory};
use crate::synth::instrument::Instrument;

/*
Simple Synth
============

An additive instrument described entirely by data. A synth is a vibrato
depth plus a list of wave components; each component is a sound source, a
frequency rule and a stack of envelopes:

  freq ──→ [Vibrato] ──┬─→ × factor + offset ──→ [source] ──┐
                       │                                    × env₁·env₂·… × velocity
                       └─→ …  one row per component         │
                                                            Σ ──→ (x, x)

Per voice, the factory draws two random values:

  vibrato rate   uniform in [4, 5) Hz
  phase offset   uniform in [0, 1), added to every periodic source

so a chord played on one synth does not start every voice in lockstep.

Voice inputs are the usual [frequency, gate, velocity, random]. The random
input is drawn once per note by the player; it detunes that note by up to
±detune cents, so repeated notes on the same voice never sound identical:

  frequency · 2^(detune · (2·random - 1) / 1200)

The output is mono, duplicated to both channels.
*/

/// Vibrato depth reaches its full amount after this many seconds.
const VIBRATO_FADE_IN: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaveSource {
    /// Periodic waveshape. `phase` is added to the per-voice offset.
    Simple {
        waveform: Waveform,
        amplitude: f32,
        phase: f64,
    },
    Noise {
        color: NoiseColor,
        amplitude: f32,
    },
    /// Sine FM with the modulator at `ratio` times the carrier.
    Fm {
        amplitude: f32,
        index: f64,
        ratio: f32,
    },
    /// Pulse with a duty cycle swept at `rate` Hz.
    Pwm {
        amplitude: f32,
        amount: f64,
        rate: f32,
        shape: PwmShape,
    },
}

impl WaveSource {
    pub fn simple(waveform: Waveform, amplitude: f32) -> Self {
        WaveSource::Simple {
            waveform,
            amplitude,
            phase: 0.0,
        }
    }

    /// `frequency -> sample` node.
    fn build(&self, phase_offset: f64) -> Result<BoxedNode> {
        Ok(match *self {
            WaveSource::Simple {
                waveform,
                amplitude,
                phase,
            } => OscNode::new(waveform, amplitude, phase + phase_offset).boxed(),
            WaveSource::Noise { color, amplitude } => {
                IgnoreInputs::new(1, NoiseNode::new(color, amplitude).boxed())?.boxed()
            }
            WaveSource::Fm {
                amplitude,
                index,
                ratio,
            } => FmOscillator::new(amplitude, index)
                .with_inputs(&[(1, ratio)])?
                .boxed(),
            WaveSource::Pwm {
                amplitude,
                amount,
                rate,
                shape,
            } => PwmOscillator::new(shape, amount, amplitude)
                .with_inputs(&[(1, rate)])?
                .boxed(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnvelopeSpec {
    Adsr(AdsrParams),
    Shape(Shape),
    Controlled {
        attack: Shape,
        release: Option<Shape>,
    },
}

impl EnvelopeSpec {
    pub fn adsr(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        EnvelopeSpec::Adsr(AdsrParams {
            attack,
            decay,
            sustain,
            release,
        })
    }

    /// `gate -> level` node.
    pub fn build(&self) -> BoxedNode {
        match self {
            EnvelopeSpec::Adsr(params) => AdsrNode::from_params(*params).boxed(),
            EnvelopeSpec::Shape(shape) => ShapeEnvelope::new(shape.clone()).boxed(),
            EnvelopeSpec::Controlled { attack, release } => {
                ControlledShapeEnvelope::new(attack.clone(), release.clone()).boxed()
            }
        }
    }

    /// Same answer as the built node's `Envelope::time_to_silence`.
    pub fn time_to_silence(&self, release_moment: f64) -> f64 {
        match self {
            EnvelopeSpec::Adsr(params) => params.release,
            EnvelopeSpec::Shape(shape) => (shape.duration() - release_moment).max(0.0),
            EnvelopeSpec::Controlled {
                release: Some(shape),
                ..
            } => shape.duration(),
            EnvelopeSpec::Controlled {
                attack,
                release: None,
            } => (attack.duration() - release_moment).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveComponent {
    pub source: WaveSource,
    pub frequency_factor: f64,
    pub frequency_offset: f64,
    pub envelopes: Vec<EnvelopeSpec>,
}

impl WaveComponent {
    pub fn new(source: WaveSource) -> Self {
        Self {
            source,
            frequency_factor: 1.0,
            frequency_offset: 0.0,
            envelopes: Vec::new(),
        }
    }

    pub fn with_frequency(mut self, factor: f64, offset: f64) -> Self {
        self.frequency_factor = factor;
        self.frequency_offset = offset;
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeSpec) -> Self {
        self.envelopes.push(envelope);
        self
    }

    fn time_to_silence(&self, release_moment: f64) -> f64 {
        self.envelopes
            .iter()
            .map(|e| e.time_to_silence(release_moment))
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleSynth {
    pub vibrato: f64,
    /// Largest per-note detune in cents.
    #[cfg_attr(feature = "serde", serde(default))]
    pub detune: f64,
    pub components: Vec<WaveComponent>,
}

impl SimpleSynth {
    pub fn new(vibrato: f64, components: Vec<WaveComponent>) -> Self {
        Self {
            vibrato,
            detune: 0.0,
            components,
        }
    }

    pub fn with_detune(mut self, cents: f64) -> Self {
        self.detune = cents;
        self
    }

    /// Build one voice, drawing its vibrato rate and phase from `rng`.
    pub fn build_voice(&self, rng: &mut StdRng) -> Result<BoxedNode> {
        let vibrato_rate = rng.gen_range(4.0..5.0);
        let phase_offset = rng.gen_range(0.0..1.0);

        let partials = self
            .components
            .iter()
            .map(|component| {
                Ok(Partial {
                    factor: component.frequency_factor,
                    offset: component.frequency_offset,
                    source: component.source.build(phase_offset)?,
                    envelopes: component.envelopes.iter().map(EnvelopeSpec::build).collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Box::new(SynthVoice {
            vibrato: VibratoNode::new(VIBRATO_FADE_IN, self.vibrato, vibrato_rate),
            detune: self.detune,
            partials,
        }))
    }

    /// Longest envelope tail among all components.
    pub fn time_to_silence(&self, release_moment: f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.time_to_silence(release_moment))
            .fold(0.0, f64::max)
    }
}

impl Instrument for SimpleSynth {
    fn voice_factory(&self) -> SharedFactory {
        let synth = self.clone();
        Arc::new(move |rng: &mut StdRng| synth.build_voice(rng))
    }

    fn release_evaluator(&self) -> ReleaseEvaluator {
        let synth = self.clone();
        Arc::new(move |release_moment| synth.time_to_silence(release_moment))
    }
}

/// One built component of a voice.
struct Partial {
    factor: f64,
    offset: f64,
    source: BoxedNode,
    envelopes: Vec<BoxedNode>,
}

impl Partial {
    fn clone_with(&self, clone: impl Fn(&BoxedNode) -> BoxedNode) -> Self {
        Self {
            factor: self.factor,
            offset: self.offset,
            source: clone(&self.source),
            envelopes: self.envelopes.iter().map(&clone).collect(),
        }
    }
}

struct SynthVoice {
    vibrato: VibratoNode,
    detune: f64,
    partials: Vec<Partial>,
}

impl GraphNode for SynthVoice {
    fn input_count(&self) -> usize {
        4
    }

    fn output_count(&self) -> usize {
        2
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.vibrato.init(ctx);
        for partial in &mut self.partials {
            partial.source.init(ctx);
            for envelope in &mut partial.envelopes {
                envelope.init(ctx);
            }
        }
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let (gate, velocity, random) = (inputs[1], inputs[2], inputs[3]);
        let cents = self.detune * (2.0 * random as f64 - 1.0);
        let mut frequency = [0.0];
        self.vibrato.process(ctx, &inputs[..1], &mut frequency);
        let frequency = frequency[0] as f64 * (cents / 1200.0).exp2();

        let mut sum = 0.0;
        let mut value = [0.0];
        for partial in &mut self.partials {
            let mut volume = velocity;
            for envelope in &mut partial.envelopes {
                envelope.process(ctx, &[gate], &mut value);
                volume *= value[0];
            }

            let freq = (frequency * partial.factor + partial.offset) as f32;
            partial.source.process(ctx, &[freq], &mut value);
            sum += value[0] * volume;
        }

        outputs[0] = sum;
        outputs[1] = sum;
    }

    fn reset(&mut self) {
        self.vibrato.reset();
        for partial in &mut self.partials {
            partial.source.reset();
            for envelope in &mut partial.envelopes {
                envelope.reset();
            }
        }
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self {
            vibrato: self.vibrato.clone(),
            detune: self.detune,
            partials: self.partials.iter().map(|p| p.clone_with(|n| n.clone_state())).collect(),
        })
    }

    fn clone_fresh(&self) -> BoxedNode {
        let mut vibrato = self.vibrato.clone();
        vibrato.reset();
        Box::new(Self {
            vibrato,
            detune: self.detune,
            partials: self.partials.iter().map(|p| p.clone_with(|n| n.clone_fresh())).collect(),
        })
    }
}
