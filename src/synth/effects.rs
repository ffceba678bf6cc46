//! Stereo effect builders for instrument output chains.
//!
//! Every builder returns a 2-in/2-out node. Mono effects are blended with
//! their input through [`wet_dry`] and repeated once per channel, so each
//! channel keeps its own filter state.

use crate::dsp::svf::SvfShape;
use crate::error::Result;
use crate::graph::branch::wet_dry;
use crate::graph::chorus::ChorusNode;
use crate::graph::distortion::{Distortion, DistortionShape};
use crate::graph::extensions::NodeExt;
use crate::graph::filter::{BiquadNode, SvfNode};
use crate::graph::node::BoxedNode;
use crate::graph::stack::{repeat, Stack};
use crate::graph::through::Pipeline;
use crate::graph::util::GainNode;

const CHANNELS: usize = 2;

fn stereo(effect: BoxedNode, mix: f32) -> Result<Stack> {
    repeat(wet_dry(effect, mix)?.boxed(), CHANNELS)
}

pub fn lowpass(cutoff: f64, q: f64, mix: f32) -> Result<Stack> {
    stereo(BiquadNode::lowpass(cutoff, q).boxed(), mix)
}

pub fn highpass(cutoff: f64, q: f64, mix: f32) -> Result<Stack> {
    stereo(BiquadNode::highpass(cutoff, q).boxed(), mix)
}

/// Fixed-parameter SVF. Shapes with a gain take it as a linear factor.
pub fn svf(shape: SvfShape, cutoff: f64, q: f64, gain: Option<f64>, mix: f32) -> Result<Stack> {
    let filter = match gain {
        Some(gain) => SvfNode::fixed_with_gain(shape, cutoff, q, gain)?,
        None => SvfNode::fixed(shape, cutoff, q)?,
    };
    stereo(filter.boxed(), mix)
}

pub fn distortion(shape: DistortionShape, mix: f32) -> Result<Stack> {
    stereo(Distortion::new(shape).boxed(), mix)
}

/// Independent chorus per channel. Each copy forks its own random stream in
/// `init`, so the two sides drift apart.
pub fn chorus(
    voice_count: usize,
    separation: f64,
    variance: f64,
    modulation_speed: f64,
    mix: f32,
) -> Result<Stack> {
    ChorusNode::new(voice_count, separation, variance, modulation_speed, mix).repeat(CHANNELS)
}

pub fn gain(gain: f32) -> GainNode {
    GainNode::new(CHANNELS, gain)
}

/// Data form of an effect, for instrument definitions built at runtime.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpec {
    Lowpass {
        cutoff: f64,
        q: f64,
        mix: f32,
    },
    Highpass {
        cutoff: f64,
        q: f64,
        mix: f32,
    },
    Svf {
        shape: SvfShape,
        cutoff: f64,
        q: f64,
        gain: Option<f64>,
        mix: f32,
    },
    Distortion {
        shape: DistortionShape,
        mix: f32,
    },
    Chorus {
        voice_count: usize,
        separation: f64,
        variance: f64,
        modulation_speed: f64,
        mix: f32,
    },
    Gain(f32),
}

impl EffectSpec {
    pub fn build(&self) -> Result<BoxedNode> {
        Ok(match *self {
            EffectSpec::Lowpass { cutoff, q, mix } => lowpass(cutoff, q, mix)?.boxed(),
            EffectSpec::Highpass { cutoff, q, mix } => highpass(cutoff, q, mix)?.boxed(),
            EffectSpec::Svf {
                shape,
                cutoff,
                q,
                gain,
                mix,
            } => svf(shape, cutoff, q, gain, mix)?.boxed(),
            EffectSpec::Distortion { shape, mix } => distortion(shape, mix)?.boxed(),
            EffectSpec::Chorus {
                voice_count,
                separation,
                variance,
                modulation_speed,
                mix,
            } => chorus(voice_count, separation, variance, modulation_speed, mix)?.boxed(),
            EffectSpec::Gain(g) => gain(g).boxed(),
        })
    }
}

/// `source → effects[0] → effects[1] → …`
pub fn apply_effects(source: BoxedNode, effects: &[EffectSpec]) -> Result<Pipeline> {
    let mut nodes = Vec::with_capacity(effects.len() + 1);
    nodes.push(source);
    for effect in effects {
        nodes.push(effect.build()?);
    }
    Pipeline::new(nodes)
}
