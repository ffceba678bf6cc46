use crate::{
    error::{GraphError, Result},
    graph::node::{BoxedNode, GraphNode, RenderCtx},
};

/*
Parallel-Independent Stacking
=============================

Stack places nodes side by side. Inputs and outputs are simply
concatenated, and the members never see each other's signals.

  inputs:  [ a0 a1 | b0 ]         (A takes 2, B takes 1)
              │  │    │
             [ A ]  [ B ]
              │       │ │
  outputs: [ a0    | b0 b1 ]      (A makes 1, B makes 2)

No arity check is needed: any two nodes can be stacked.

repeat(node, n) stacks n fresh copies of a template, which is how a mono
effect becomes a stereo one:

  repeat(BiquadNode::lowpass(800.0, 0.7).boxed(), 2)?   // 2 in -> 2 out
*/

pub struct Stack {
    nodes: Vec<BoxedNode>,
    input_count: usize,
    output_count: usize,
}

impl Stack {
    pub fn new(nodes: Vec<BoxedNode>) -> Self {
        let input_count = nodes.iter().map(|n| n.input_count()).sum();
        let output_count = nodes.iter().map(|n| n.output_count()).sum();
        Self {
            nodes,
            input_count,
            output_count,
        }
    }

    pub fn pair(a: BoxedNode, b: BoxedNode) -> Self {
        Self::new(vec![a, b])
    }
}

/// Stack `count` copies of `template` with fresh state.
///
/// The template itself becomes the first copy.
pub fn repeat(template: BoxedNode, count: usize) -> Result<Stack> {
    if count == 0 {
        return Err(GraphError::ZeroRepeat);
    }

    let mut nodes = Vec::with_capacity(count);
    for _ in 1..count {
        nodes.push(template.clone_fresh());
    }
    nodes.insert(0, template);

    Ok(Stack::new(nodes))
}

impl GraphNode for Stack {
    fn input_count(&self) -> usize {
        self.input_count
    }

    fn output_count(&self) -> usize {
        self.output_count
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        for node in &mut self.nodes {
            node.init(ctx);
        }
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let mut in_offset = 0;
        let mut out_offset = 0;
        for node in &mut self.nodes {
            let ins = node.input_count();
            let outs = node.output_count();
            node.process(
                ctx,
                &inputs[in_offset..in_offset + ins],
                &mut outputs[out_offset..out_offset + outs],
            );
            in_offset += ins;
            out_offset += outs;
        }
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self::new(
            self.nodes.iter().map(|n| n.clone_state()).collect(),
        ))
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(
            self.nodes.iter().map(|n| n.clone_fresh()).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        extensions::NodeExt,
        util::{ConstantNode, CustomNode},
    };

    #[test]
    fn concatenates_inputs_and_outputs() {
        let sum = CustomNode::new(2, 1, |i, o| o[0] = i[0] + i[1]);
        let split = CustomNode::new(1, 2, |i, o| {
            o[0] = i[0];
            o[1] = -i[0];
        });
        let mut node = sum.beside(split);

        assert_eq!(node.input_count(), 3);
        assert_eq!(node.output_count(), 3);

        let mut out = [0.0; 3];
        node.process(&RenderCtx::new(48_000, 0), &[1.0, 2.0, 5.0], &mut out);
        assert_eq!(out, [3.0, 5.0, -5.0]);
    }

    #[test]
    fn repeat_builds_independent_copies() {
        let mut node = repeat(Box::new(ConstantNode::new(vec![0.25])), 3).unwrap();
        let mut out = [0.0; 3];
        node.process(&RenderCtx::new(48_000, 0), &[], &mut out);

        assert_eq!(node.output_count(), 3);
        assert_eq!(out, [0.25; 3]);
    }

    #[test]
    fn repeat_zero_times_is_rejected() {
        let result = repeat(Box::new(ConstantNode::new(vec![1.0])), 0);
        assert!(matches!(result, Err(GraphError::ZeroRepeat)));
    }
}
