use crate::{
    error::{GraphError, Result},
    graph::node::{BoxedNode, GraphNode, RenderCtx},
};

/// Partial application: pin some of a node's inputs to constants.
///
/// The remaining inputs fill the free slots in their original index order.
/// Pinning input 1 of a 3-input node leaves a 2-input node where
/// `[x, y]` is forwarded as `[x, fixed, y]`.
pub struct Partial {
    node: BoxedNode,
    slots: Vec<Option<f32>>,
    full_inputs: Vec<f32>,
    free_count: usize,
}

impl Partial {
    pub fn new(node: BoxedNode, fixed: &[(usize, f32)]) -> Result<Self> {
        let inputs = node.input_count();
        let mut slots = vec![None; inputs];

        for &(index, value) in fixed {
            let slot = slots
                .get_mut(index)
                .ok_or(GraphError::InvalidInputIndex { index, inputs })?;
            *slot = Some(value);
        }

        let free_count = slots.iter().filter(|s| s.is_none()).count();
        let full_inputs = slots.iter().map(|s| s.unwrap_or(0.0)).collect();

        Ok(Self {
            node,
            slots,
            full_inputs,
            free_count,
        })
    }

    fn with_node(&self, node: BoxedNode) -> Self {
        Self {
            node,
            slots: self.slots.clone(),
            full_inputs: self.full_inputs.clone(),
            free_count: self.free_count,
        }
    }
}

impl GraphNode for Partial {
    fn input_count(&self) -> usize {
        self.free_count
    }

    fn output_count(&self) -> usize {
        self.node.output_count()
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.node.init(ctx);
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let mut free = inputs.iter();
        for (target, slot) in self.full_inputs.iter_mut().zip(&self.slots) {
            if slot.is_none() {
                *target = free.next().copied().unwrap_or(0.0);
            }
        }
        self.node.process(ctx, &self.full_inputs, outputs);
    }

    fn reset(&mut self) {
        self.node.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.with_node(self.node.clone_state()))
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.with_node(self.node.clone_fresh()))
    }
}
