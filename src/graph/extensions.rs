use crate::{
    error::Result,
    graph::{
        branch::Branch,
        mix::{Mix, MixOp, Routing},
        node::{BoxedNode, GraphNode},
        partial::Partial,
        stack::{repeat, Stack},
        through::Through,
        util::GainNode,
    },
};

/// Fluent combinators for building graphs.
///
/// Every combinator that has an arity rule returns a `Result`, so a chain
/// reads as `osc.amplify(env)?.through(filter)?`.
pub trait NodeExt: GraphNode + Sized + 'static {
    fn boxed(self) -> BoxedNode {
        Box::new(self)
    }

    /// Sequence: `self` feeds `next`.
    fn through<N: GraphNode + 'static>(self, next: N) -> Result<Through> {
        Through::new(self.boxed(), Box::new(next))
    }

    /// Parallel-independent: inputs and outputs concatenated.
    fn beside<N: GraphNode + 'static>(self, other: N) -> Stack {
        Stack::pair(self.boxed(), Box::new(other))
    }

    /// Parallel-summed over the same inputs.
    fn mix<N: GraphNode + 'static>(self, other: N) -> Result<Mix> {
        Mix::sum(self.boxed(), Box::new(other))
    }

    /// Parallel-multiplied over the same inputs.
    fn amplify<N: GraphNode + 'static>(self, other: N) -> Result<Mix> {
        Mix::product(self.boxed(), Box::new(other))
    }

    /// Parallel-summed over concatenated inputs: `self` takes the first
    /// inputs, `other` the rest.
    fn mix_split<N: GraphNode + 'static>(self, other: N) -> Result<Mix> {
        Mix::new(self.boxed(), Box::new(other), MixOp::Sum, Routing::Split)
    }

    /// Parallel-multiplied over concatenated inputs. The usual way to put
    /// an envelope on a sound: `osc.amplify_split(adsr)` takes `[freq, gate]`.
    fn amplify_split<N: GraphNode + 'static>(self, other: N) -> Result<Mix> {
        Mix::new(self.boxed(), Box::new(other), MixOp::Product, Routing::Split)
    }

    /// Shared inputs, concatenated outputs.
    fn branch<N: GraphNode + 'static>(self, other: N) -> Result<Branch> {
        Branch::new(self.boxed(), Box::new(other))
    }

    /// Fix some inputs to constants: `(index, value)` pairs.
    fn with_inputs(self, fixed: &[(usize, f32)]) -> Result<Partial> {
        Partial::new(self.boxed(), fixed)
    }

    fn repeat(self, count: usize) -> Result<Stack> {
        repeat(self.boxed(), count)
    }

    /// Scale every output by a constant factor.
    fn scaled(self, factor: f32) -> Result<Through> {
        let channels = self.output_count();
        self.through(GainNode::new(channels, factor))
    }
}

impl<T: GraphNode + 'static> NodeExt for T {}
