//! Small stateless nodes used as glue between larger graphs.

use std::sync::Arc;

use crate::{
    error::{GraphError, Result},
    graph::node::{BoxedNode, GraphNode, RenderCtx},
};

/// Zero inputs, emits a fixed vector every tick.
#[derive(Clone)]
pub struct ConstantNode {
    values: Vec<f32>,
}

impl ConstantNode {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn value(value: f32) -> Self {
        Self::new(vec![value])
    }

    pub fn silence(channels: usize) -> Self {
        Self::new(vec![0.0; channels])
    }
}

impl GraphNode for ConstantNode {
    fn input_count(&self) -> usize {
        0
    }

    fn output_count(&self) -> usize {
        self.values.len()
    }

    fn process(&mut self, _ctx: &RenderCtx, _inputs: &[f32], outputs: &mut [f32]) {
        outputs.copy_from_slice(&self.values);
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// Identity over `channels` signals.
#[derive(Clone)]
pub struct PassNode {
    channels: usize,
}

impl PassNode {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }
}

impl GraphNode for PassNode {
    fn input_count(&self) -> usize {
        self.channels
    }

    fn output_count(&self) -> usize {
        self.channels
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        outputs.copy_from_slice(inputs);
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// Swallows its inputs and produces nothing.
#[derive(Clone)]
pub struct SinkNode {
    channels: usize,
}

impl SinkNode {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }
}

impl GraphNode for SinkNode {
    fn input_count(&self) -> usize {
        self.channels
    }

    fn output_count(&self) -> usize {
        0
    }

    fn process(&mut self, _ctx: &RenderCtx, _inputs: &[f32], _outputs: &mut [f32]) {}

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// Wraps a source so it can sit where `channels` inputs are expected.
pub struct IgnoreInputs {
    channels: usize,
    source: BoxedNode,
}

impl IgnoreInputs {
    pub fn new(channels: usize, source: BoxedNode) -> Result<Self> {
        if source.input_count() != 0 {
            return Err(GraphError::arity("ignore inputs", 0, source.input_count()));
        }
        Ok(Self { channels, source })
    }
}

impl GraphNode for IgnoreInputs {
    fn input_count(&self) -> usize {
        self.channels
    }

    fn output_count(&self) -> usize {
        self.source.output_count()
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.source.init(ctx);
    }

    fn process(&mut self, ctx: &RenderCtx, _inputs: &[f32], outputs: &mut [f32]) {
        self.source.process(ctx, &[], outputs);
    }

    fn reset(&mut self) {
        self.source.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self {
            channels: self.channels,
            source: self.source.clone_state(),
        })
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self {
            channels: self.channels,
            source: self.source.clone_fresh(),
        })
    }
}

type MapFn = dyn Fn(&[f32], &mut [f32]) + Send + Sync;

/// Stateless node backed by a pure function.
///
/// The function is shared between clones, so it must not hold state.
#[derive(Clone)]
pub struct CustomNode {
    inputs: usize,
    outputs: usize,
    map: Arc<MapFn>,
}

impl CustomNode {
    pub fn new<F>(inputs: usize, outputs: usize, map: F) -> Self
    where
        F: Fn(&[f32], &mut [f32]) + Send + Sync + 'static,
    {
        Self {
            inputs,
            outputs,
            map: Arc::new(map),
        }
    }

    /// `channels` in, every input written twice: `[a, b] -> [a, b, a, b]`.
    pub fn duplicate(channels: usize) -> Self {
        Self::new(channels, channels * 2, move |i, o| {
            o[..channels].copy_from_slice(i);
            o[channels..].copy_from_slice(i);
        })
    }

    /// Sum of all inputs.
    pub fn sum(channels: usize) -> Self {
        Self::new(channels, 1, |i, o| o[0] = i.iter().sum())
    }
}

impl GraphNode for CustomNode {
    fn input_count(&self) -> usize {
        self.inputs
    }

    fn output_count(&self) -> usize {
        self.outputs
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        (self.map)(inputs, outputs);
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// `[a, b, t] -> a + (b - a) * t`
#[derive(Clone, Default)]
pub struct LerpNode;

impl LerpNode {
    pub fn new() -> Self {
        Self
    }
}

impl GraphNode for LerpNode {
    fn input_count(&self) -> usize {
        3
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let (a, b, t) = (inputs[0], inputs[1], inputs[2]);
        outputs[0] = a + (b - a) * t;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// Multiplies every channel by a fixed factor.
#[derive(Clone)]
pub struct GainNode {
    channels: usize,
    gain: f32,
}

impl GainNode {
    pub fn new(channels: usize, gain: f32) -> Self {
        Self { channels, gain }
    }
}

impl GraphNode for GainNode {
    fn input_count(&self) -> usize {
        self.channels
    }

    fn output_count(&self) -> usize {
        self.channels
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        for (o, i) in outputs.iter_mut().zip(inputs) {
            *o = i * self.gain;
        }
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

/// Stereo balance: `pan = -1` is hard left, `pan = 1` hard right.
///
/// `left *= min(1, 1 - pan)`, `right *= min(1, 1 + pan)`. The centre keeps
/// both channels at unity.
#[derive(Clone)]
pub struct StereoPan {
    pan: f32,
}

impl StereoPan {
    pub fn new(pan: f32) -> Self {
        Self { pan }
    }

    #[inline]
    pub fn gains(pan: f32) -> (f32, f32) {
        ((1.0 - pan).min(1.0), (1.0 + pan).min(1.0))
    }
}

impl GraphNode for StereoPan {
    fn input_count(&self) -> usize {
        2
    }

    fn output_count(&self) -> usize {
        2
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let (left, right) = Self::gains(self.pan);
        outputs[0] = inputs[0] * left;
        outputs[1] = inputs[1] * right;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(node: &mut dyn GraphNode, inputs: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; node.output_count()];
        node.process(&RenderCtx::new(48_000, 0), inputs, &mut out);
        out
    }

    #[test]
    fn duplicate_repeats_the_input_block() {
        let mut node = CustomNode::duplicate(2);
        assert_eq!(run(&mut node, &[1.0, 2.0]), vec![1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn lerp_endpoints() {
        let mut node = LerpNode::new();
        assert_eq!(run(&mut node, &[2.0, 4.0, 0.0]), vec![2.0]);
        assert_eq!(run(&mut node, &[2.0, 4.0, 1.0]), vec![4.0]);
        assert_eq!(run(&mut node, &[2.0, 4.0, 0.5]), vec![3.0]);
    }

    #[test]
    fn pan_law() {
        assert_eq!(StereoPan::gains(-1.0), (1.0, 0.0));
        assert_eq!(StereoPan::gains(0.0), (1.0, 1.0));
        assert_eq!(StereoPan::gains(1.0), (0.0, 1.0));
        assert_eq!(StereoPan::gains(0.5), (0.5, 1.0));
    }

    #[test]
    fn ignore_inputs_requires_a_source() {
        let result = IgnoreInputs::new(1, Box::new(PassNode::new(1)));
        assert!(result.is_err());

        let mut node = IgnoreInputs::new(3, Box::new(ConstantNode::value(0.5))).unwrap();
        assert_eq!(node.input_count(), 3);
        assert_eq!(run(&mut node, &[9.0, 9.0, 9.0]), vec![0.5]);
    }

    #[test]
    fn sink_produces_nothing() {
        let mut node = SinkNode::new(2);
        assert!(run(&mut node, &[1.0, 1.0]).is_empty());
    }
}
