use crate::{
    error::{GraphError, Result},
    graph::{
        extensions::NodeExt,
        node::{BoxedNode, GraphNode, RenderCtx},
        through::Through,
        util::{ConstantNode, LerpNode, PassNode},
    },
};

/// Feed the same inputs into two paths and concatenate their outputs.
///
/// ```text
///   inputs ──┬──→ [A] ──→ a outputs ─┐
///            └──→ [B] ──→ b outputs ─┴──→ [a.. | b..]
/// ```
///
/// Both paths must take the same number of inputs.
pub struct Branch {
    a: BoxedNode,
    b: BoxedNode,
}

impl Branch {
    pub fn new(a: BoxedNode, b: BoxedNode) -> Result<Self> {
        if a.input_count() != b.input_count() {
            return Err(GraphError::arity("branch", a.input_count(), b.input_count()));
        }
        Ok(Self { a, b })
    }
}

impl GraphNode for Branch {
    fn input_count(&self) -> usize {
        self.a.input_count()
    }

    fn output_count(&self) -> usize {
        self.a.output_count() + self.b.output_count()
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.a.init(ctx);
        self.b.init(ctx);
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let (a_out, b_out) = outputs.split_at_mut(self.a.output_count());
        self.a.process(ctx, inputs, a_out);
        self.b.process(ctx, inputs, b_out);
    }

    fn reset(&mut self) {
        self.a.reset();
        self.b.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self {
            a: self.a.clone_state(),
            b: self.b.clone_state(),
        })
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self {
            a: self.a.clone_fresh(),
            b: self.b.clone_fresh(),
        })
    }
}

/// Blend a mono effect with its own input.
///
/// `mix = 0.0` is fully dry, `mix = 1.0` fully wet. Built entirely from the
/// algebra: `pass.branch(effect).beside(constant(mix)).through(lerp)`.
pub fn wet_dry(effect: BoxedNode, mix: f32) -> Result<Through> {
    PassNode::new(1)
        .branch(effect)?
        .beside(ConstantNode::new(vec![mix]))
        .through(LerpNode::new())
}
