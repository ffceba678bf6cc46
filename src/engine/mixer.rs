use crate::error::{GraphError, Result};
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};
use crate::graph::util::StereoPan;

/*
Mixer
=====

The top of a song graph. Every instrument player (or any other stereo
source) becomes one channel strip with a volume and a pan:

  [player A] ──→ × (vol·L, vol·R) ──┐
  [player B] ──→ × (vol·L, vol·R) ──┼──→ Σ ──→ (left, right)
  [drone   ] ──→ × (vol·L, vol·R) ──┘

where (L, R) = (min(1, 1 - pan), min(1, 1 + pan)). At the centre both
channels pass at unity; hard left silences the right channel entirely.

Sources take no inputs and produce exactly two outputs. Volume must be
non-negative and pan must lie in [-1, 1]; both are checked when the
source is added.
*/

struct Strip {
    source: BoxedNode,
    left: f32,
    right: f32,
}

#[derive(Default)]
pub struct Mixer {
    strips: Vec<Strip>,
    scratch: [f32; 2],
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, source: BoxedNode, volume: f32, pan: f32) -> Result<()> {
        if source.input_count() != 0 || source.output_count() != 2 {
            return Err(GraphError::SourceArity {
                inputs: source.input_count(),
                outputs: source.output_count(),
            });
        }
        if volume.is_nan() || volume < 0.0 {
            return Err(GraphError::InvalidParameter {
                name: "volume",
                value: volume as f64,
            });
        }
        if !(-1.0..=1.0).contains(&pan) {
            return Err(GraphError::InvalidParameter {
                name: "pan",
                value: pan as f64,
            });
        }

        let (left, right) = StereoPan::gains(pan);
        self.strips.push(Strip {
            source,
            left: volume * left,
            right: volume * right,
        });
        Ok(())
    }

    /// Builder form of [`Mixer::add_source`].
    pub fn with_source(mut self, source: BoxedNode, volume: f32, pan: f32) -> Result<Self> {
        self.add_source(source, volume, pan)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// Per-channel gains of strip `index`.
    pub fn gains(&self, index: usize) -> Option<(f32, f32)> {
        self.strips.get(index).map(|s| (s.left, s.right))
    }

    fn map_strips(&self, clone: impl Fn(&BoxedNode) -> BoxedNode) -> Self {
        Self {
            strips: self
                .strips
                .iter()
                .map(|s| Strip {
                    source: clone(&s.source),
                    left: s.left,
                    right: s.right,
                })
                .collect(),
            scratch: [0.0; 2],
        }
    }
}

impl Clone for Mixer {
    /// Deep copy, including every source's running state.
    fn clone(&self) -> Self {
        self.map_strips(|s| s.clone_state())
    }
}

impl GraphNode for Mixer {
    fn input_count(&self) -> usize {
        0
    }

    fn output_count(&self) -> usize {
        2
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        for strip in &mut self.strips {
            strip.source.init(ctx);
        }
    }

    fn process(&mut self, ctx: &RenderCtx, _inputs: &[f32], outputs: &mut [f32]) {
        let mut left = 0.0;
        let mut right = 0.0;
        for strip in &mut self.strips {
            strip.source.process(ctx, &[], &mut self.scratch);
            left += self.scratch[0] * strip.left;
            right += self.scratch[1] * strip.right;
        }
        outputs[0] = left;
        outputs[1] = right;
    }

    fn reset(&mut self) {
        for strip in &mut self.strips {
            strip.source.reset();
        }
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.map_strips(|s| s.clone_fresh()))
    }
}
