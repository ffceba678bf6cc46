use crate::{
    error::{GraphError, Result},
    graph::node::{BoxedNode, GraphNode, RenderCtx},
};

/*
Parallel Summing and Multiplying
================================

Mix runs two nodes in parallel and combines their outputs element-wise,
either by addition (layering) or multiplication (amplitude or ring
modulation). Both nodes must produce the same number of outputs.

Input routing:
--------------
Shared (default):
  Both nodes receive the SAME input vector. Their input counts must match.

     inputs ──┬──→ [A] ──┐
              └──→ [B] ──┴──→ (+ or ×) ──→ outputs

  Typical use: an oscillator and an envelope that both read the voice
  inputs (frequency, gate, velocity, random) and are multiplied:

    let voice = osc.amplify(env)?;

Split:
  The input vector is divided between the nodes, like Stack, and only the
  outputs are combined.

     [a.. | b..] ──→ [A] [B] ──→ (+ or ×) ──→ outputs

  Typical use: multiplying a signal by a control signal that arrives on a
  separate input.

Arity rules (checked at construction):
  - A.output_count() == B.output_count()     always
  - A.input_count()  == B.input_count()      for Shared routing

Sum vs Product:
---------------
  Sum:      out[i] = a[i] + b[i]
  Product:  out[i] = a[i] * b[i]
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixOp {
    Sum,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Routing {
    #[default]
    Shared,
    Split,
}

pub struct Mix {
    a: BoxedNode,
    b: BoxedNode,
    op: MixOp,
    routing: Routing,
    temp_buffer: Vec<f32>,
}

impl Mix {
    pub fn new(a: BoxedNode, b: BoxedNode, op: MixOp, routing: Routing) -> Result<Self> {
        let name = match op {
            MixOp::Sum => "mix",
            MixOp::Product => "amplify",
        };

        if a.output_count() != b.output_count() {
            return Err(GraphError::arity(name, a.output_count(), b.output_count()));
        }
        if routing == Routing::Shared && a.input_count() != b.input_count() {
            return Err(GraphError::arity(name, a.input_count(), b.input_count()));
        }

        let temp_buffer = vec![0.0; b.output_count()];
        Ok(Self {
            a,
            b,
            op,
            routing,
            temp_buffer,
        })
    }

    pub fn sum(a: BoxedNode, b: BoxedNode) -> Result<Self> {
        Self::new(a, b, MixOp::Sum, Routing::Shared)
    }

    pub fn product(a: BoxedNode, b: BoxedNode) -> Result<Self> {
        Self::new(a, b, MixOp::Product, Routing::Shared)
    }

    fn rebuild(&self, a: BoxedNode, b: BoxedNode, temp_buffer: Vec<f32>) -> Self {
        Self {
            a,
            b,
            op: self.op,
            routing: self.routing,
            temp_buffer,
        }
    }
}

impl GraphNode for Mix {
    fn input_count(&self) -> usize {
        match self.routing {
            Routing::Shared => self.a.input_count(),
            Routing::Split => self.a.input_count() + self.b.input_count(),
        }
    }

    fn output_count(&self) -> usize {
        self.a.output_count()
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.a.init(ctx);
        self.b.init(ctx);
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let (a_in, b_in) = match self.routing {
            Routing::Shared => (inputs, inputs),
            Routing::Split => inputs.split_at(self.a.input_count()),
        };

        self.a.process(ctx, a_in, outputs);
        self.b.process(ctx, b_in, &mut self.temp_buffer);

        match self.op {
            MixOp::Sum => {
                for (o, b) in outputs.iter_mut().zip(&self.temp_buffer) {
                    *o += b;
                }
            }
            MixOp::Product => {
                for (o, b) in outputs.iter_mut().zip(&self.temp_buffer) {
                    *o *= b;
                }
            }
        }
    }

    fn reset(&mut self) {
        self.a.reset();
        self.b.reset();
        self.temp_buffer.fill(0.0);
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.rebuild(
            self.a.clone_state(),
            self.b.clone_state(),
            self.temp_buffer.clone(),
        ))
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.rebuild(
            self.a.clone_fresh(),
            self.b.clone_fresh(),
            vec![0.0; self.temp_buffer.len()],
        ))
    }
}
