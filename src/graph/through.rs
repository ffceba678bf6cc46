use crate::{
    error::{GraphError, Result},
    graph::node::{BoxedNode, GraphNode, RenderCtx},
};

/*
Serial Signal Chain (Through / Pipeline)
========================================

Through connects two nodes in series: every output of the first node feeds
the matching input of the second. This is the fundamental building block for
chains like: oscillator → filter → envelope.

How It Works:
-------------
1. Process the source with the caller's inputs into a scratch buffer
2. Process the second node with that scratch buffer as its inputs

  Source:  inputs ──→ [A] ──→ scratch (A.outputs values)
  Second:  scratch ──→ [B] ──→ outputs (B.outputs values)

The arity check happens once, when the chain is built. A chain whose
widths do not line up is rejected before a single sample is rendered:

  A.output_count() == B.input_count()   or   GraphError::ArityMismatch

Pipeline is the n-ary form of the same thing:

  [n0] ──→ [n1] ──→ [n2] ──→ ... ──→ [nk]

Each neighbour pair is checked the same way. The live player uses a
pipeline to put a limiter behind the mixed song:

  Pipeline::new(vec![mixer, limiter])

Through vs Mix vs Branch:
-------------------------
- Through: Serial processing (A feeds B)
- Mix:     Parallel, both see the same inputs, outputs summed or multiplied
- Branch:  Parallel, both see the same inputs, outputs concatenated
*/

pub struct Through {
    source: BoxedNode,
    next: BoxedNode,
    scratch: Vec<f32>,
}

impl Through {
    pub fn new(source: BoxedNode, next: BoxedNode) -> Result<Self> {
        if source.output_count() != next.input_count() {
            return Err(GraphError::arity(
                "through",
                next.input_count(),
                source.output_count(),
            ));
        }

        let scratch = vec![0.0; source.output_count()];
        Ok(Self {
            source,
            next,
            scratch,
        })
    }
}

impl GraphNode for Through {
    fn input_count(&self) -> usize {
        self.source.input_count()
    }

    fn output_count(&self) -> usize {
        self.next.output_count()
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.source.init(ctx);
        self.next.init(ctx);
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        self.source.process(ctx, inputs, &mut self.scratch);
        self.next.process(ctx, &self.scratch, outputs);
    }

    fn reset(&mut self) {
        self.source.reset();
        self.next.reset();
        self.scratch.fill(0.0);
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self {
            source: self.source.clone_state(),
            next: self.next.clone_state(),
            scratch: self.scratch.clone(),
        })
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self {
            source: self.source.clone_fresh(),
            next: self.next.clone_fresh(),
            scratch: vec![0.0; self.scratch.len()],
        })
    }
}

/// Chain of nodes processed in order.
pub struct Pipeline {
    nodes: Vec<BoxedNode>,
    // One buffer per link between neighbours
    links: Vec<Vec<f32>>,
}

impl Pipeline {
    pub fn new(nodes: Vec<BoxedNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(GraphError::EmptyPipeline);
        }

        for pair in nodes.windows(2) {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(GraphError::arity(
                    "pipeline",
                    pair[1].input_count(),
                    pair[0].output_count(),
                ));
            }
        }

        let links = nodes[..nodes.len() - 1]
            .iter()
            .map(|node| vec![0.0; node.output_count()])
            .collect();

        Ok(Self { nodes, links })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl GraphNode for Pipeline {
    fn input_count(&self) -> usize {
        self.nodes[0].input_count()
    }

    fn output_count(&self) -> usize {
        self.nodes[self.nodes.len() - 1].output_count()
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        for node in &mut self.nodes {
            node.init(ctx);
        }
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let last = self.nodes.len() - 1;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            // Split so the previous link can be read while the next is written
            let (before, after) = self.links.split_at_mut(i);
            let node_inputs: &[f32] = if i == 0 { inputs } else { &before[i - 1] };

            if i == last {
                node.process(ctx, node_inputs, outputs);
            } else {
                node.process(ctx, node_inputs, &mut after[0]);
            }
        }
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        for link in &mut self.links {
            link.fill(0.0);
        }
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(Self {
            nodes: self.nodes.iter().map(|n| n.clone_state()).collect(),
            links: self.links.clone(),
        })
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self {
            nodes: self.nodes.iter().map(|n| n.clone_fresh()).collect(),
            links: self.links.iter().map(|l| vec![0.0; l.len()]).collect(),
        })
    }
}
