use std::sync::Arc;

use crate::dsp::biquad::{BiquadCoefficients, BiquadShape, BiquadState};
use crate::dsp::svf::{SvfCoefficients, SvfParams, SvfShape, SvfState};
use crate::error::{GraphError, Result};
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/*
Filter Nodes
============

BiquadNode:  fixed-parameter second-order filter, 1 in / 1 out. The
             coefficients come from a factory that receives the sample rate
             and runs once in `init`.

SvfNode:     state-variable filter whose cutoff, Q and gain may each be
             fixed or arrive as extra signal inputs. Coefficients are only
             recomputed when those values change.

| type      | passes          | rejects      |
| --------- | --------------- | ------------ |
| low-pass  | below cutoff    | above cutoff |
| high-pass | above cutoff    | below cutoff |
| band-pass | around center   | far away     |
| notch     | far away        | around center|
| bell      | everything, with a boost or cut around the center |

Shapes that take a gain (biquad bell, SVF bell and shelves) refuse to be
built without one, and the other shapes refuse to be built with one. That
check happens at construction, never while rendering.

Cutoff at or above Nyquist and Q <= 0 are not validated. Those values
produce whatever the formulas produce.
*/

type CoefficientFactory = dyn Fn(f64) -> BiquadCoefficients + Send + Sync;

pub struct BiquadNode {
    factory: Arc<CoefficientFactory>,
    coefficients: BiquadCoefficients,
    state: BiquadState,
}

impl BiquadNode {
    /// Build from a custom coefficient factory taking the sample rate.
    pub fn custom<F>(factory: F) -> Self
    where
        F: Fn(f64) -> BiquadCoefficients + Send + Sync + 'static,
    {
        Self::from_factory(Arc::new(factory))
    }

    fn from_factory(factory: Arc<CoefficientFactory>) -> Self {
        let coefficients = factory(crate::DEFAULT_SAMPLE_RATE as f64);
        Self {
            factory,
            coefficients,
            state: BiquadState::default(),
        }
    }

    /// Build a cookbook shape. `gain_db` must be present exactly when the
    /// shape takes a gain.
    pub fn from_shape(shape: BiquadShape, cutoff: f64, q: f64, gain_db: Option<f64>) -> Result<Self> {
        let gain_db = match (shape.has_gain(), gain_db) {
            (true, Some(gain)) => gain,
            (false, None) => 0.0,
            (true, None) => return Err(GraphError::MissingGain { shape: shape.name() }),
            (false, Some(_)) => {
                return Err(GraphError::UnexpectedGain { shape: shape.name() })
            }
        };

        Ok(Self::custom(move |sample_rate| {
            BiquadCoefficients::design(shape, sample_rate, cutoff, q, gain_db)
        }))
    }

    pub fn lowpass(cutoff: f64, q: f64) -> Self {
        Self::custom(move |sr| BiquadCoefficients::lowpass(sr, cutoff, q))
    }

    pub fn highpass(cutoff: f64, q: f64) -> Self {
        Self::custom(move |sr| BiquadCoefficients::highpass(sr, cutoff, q))
    }

    pub fn bandpass(center: f64, q: f64) -> Self {
        Self::custom(move |sr| BiquadCoefficients::bandpass(sr, center, q))
    }

    pub fn notch(center: f64, q: f64) -> Self {
        Self::custom(move |sr| BiquadCoefficients::notch(sr, center, q))
    }

    pub fn bell(center: f64, q: f64, gain_db: f64) -> Self {
        Self::custom(move |sr| BiquadCoefficients::bell(sr, center, q, gain_db))
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }
}

impl GraphNode for BiquadNode {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.coefficients = (self.factory)(ctx.sample_rate() as f64);
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        outputs[0] = self.state.process(&self.coefficients, inputs[0]);
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self {
            factory: Arc::clone(&self.factory),
            coefficients: self.coefficients,
            state: self.state.clone(),
        })
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self {
            factory: Arc::clone(&self.factory),
            coefficients: self.coefficients,
            state: BiquadState::default(),
        })
    }
}

/// Where an SVF parameter comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SvfParam {
    Fixed(f64),
    /// Read from the next extra input, in cutoff, Q, gain order.
    Input,
}

#[derive(Debug, Clone)]
pub struct SvfNode {
    shape: SvfShape,
    cutoff: SvfParam,
    q: SvfParam,
    gain: Option<SvfParam>,
    input_count: usize,

    cached: Option<(SvfParams, SvfCoefficients)>,
    state: SvfState,
}

impl SvfNode {
    /// Inputs are `[signal, cutoff?, q?, gain?]`, one extra input for every
    /// parameter given as [`SvfParam::Input`].
    pub fn new(shape: SvfShape, cutoff: SvfParam, q: SvfParam, gain: Option<SvfParam>) -> Result<Self> {
        match (shape.has_gain(), gain.is_some()) {
            (true, false) => return Err(GraphError::MissingGain { shape: shape.name() }),
            (false, true) => return Err(GraphError::UnexpectedGain { shape: shape.name() }),
            _ => {}
        }

        let dynamic = [Some(cutoff), Some(q), gain]
            .iter()
            .filter(|p| matches!(p, Some(SvfParam::Input)))
            .count();

        Ok(Self {
            shape,
            cutoff,
            q,
            gain,
            input_count: 1 + dynamic,
            cached: None,
            state: SvfState::default(),
        })
    }

    /// Fixed-parameter filter without gain.
    pub fn fixed(shape: SvfShape, cutoff: f64, q: f64) -> Result<Self> {
        Self::new(shape, SvfParam::Fixed(cutoff), SvfParam::Fixed(q), None)
    }

    /// Fixed-parameter filter with a linear gain.
    pub fn fixed_with_gain(shape: SvfShape, cutoff: f64, q: f64, gain: f64) -> Result<Self> {
        Self::new(
            shape,
            SvfParam::Fixed(cutoff),
            SvfParam::Fixed(q),
            Some(SvfParam::Fixed(gain)),
        )
    }

    pub fn lowpass(cutoff: f64, q: f64) -> Self {
        Self::unchecked(SvfShape::Lowpass, cutoff, q)
    }

    pub fn highpass(cutoff: f64, q: f64) -> Self {
        Self::unchecked(SvfShape::Highpass, cutoff, q)
    }

    pub fn bandpass(cutoff: f64, q: f64) -> Self {
        Self::unchecked(SvfShape::Bandpass, cutoff, q)
    }

    fn unchecked(shape: SvfShape, cutoff: f64, q: f64) -> Self {
        Self {
            shape,
            cutoff: SvfParam::Fixed(cutoff),
            q: SvfParam::Fixed(q),
            gain: None,
            input_count: 1,
            cached: None,
            state: SvfState::default(),
        }
    }

    fn params(&self, ctx: &RenderCtx, inputs: &[f32]) -> SvfParams {
        let mut extra = inputs[1..].iter();
        let mut resolve = |param: SvfParam| match param {
            SvfParam::Fixed(value) => value,
            SvfParam::Input => extra.next().copied().unwrap_or(0.0) as f64,
        };

        let cutoff = resolve(self.cutoff);
        let q = resolve(self.q);
        let gain = self.gain.map(&mut resolve).unwrap_or(1.0);

        SvfParams {
            sample_rate: ctx.sample_rate() as f64,
            cutoff,
            q,
            gain,
        }
    }

    fn coefficients(&mut self, params: SvfParams) -> SvfCoefficients {
        match self.cached {
            Some((prev, coefficients)) if prev == params => coefficients,
            _ => {
                let coefficients = SvfCoefficients::design(self.shape, &params);
                self.cached = Some((params, coefficients));
                coefficients
            }
        }
    }
}

impl GraphNode for SvfNode {
    fn input_count(&self) -> usize {
        self.input_count
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let params = self.params(ctx, inputs);
        let coefficients = self.coefficients(params);
        outputs[0] = self.state.process(&coefficients, inputs[0]);
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        let mut fresh = self.clone();
        fresh.state.reset();
        fresh.cached = None;
        Box::new(fresh)
    }
}
