use crate::dsp::distortion::{foldback, hard_clip, soft_clip, tanh_clip};
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/*
Distortion Node
===============

Adds harmonics and grit by passing each sample through a waveshaper.

Shapes
------

HardClip(hardness):  clamp(x * hardness, -1, 1)
                     Harsh and buzzy, odd harmonics like a fuzz pedal.

SoftClip:            x / (1 + |x|)
                     Gradual saturation that never quite reaches 1.

Tanh(hardness):      tanh(x * hardness)
                     Warm, tube-like. The violin preset uses Tanh(3.0).

Foldback(drive, threshold):
                     Folds the signal back at the threshold. Metallic.

The node is mono (1 in, 1 out). For a dry/wet blend wrap it with
`branch::wet_dry`, and for stereo `repeat(.., 2)`.

Example usage:

  let gritty = saw.through(Distortion::tanh(3.0))?;
  let blended = wet_dry(Box::new(Distortion::hard_clip(4.0)), 0.3)?;
*/

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistortionShape {
    HardClip { hardness: f32 },
    SoftClip,
    Tanh { hardness: f32 },
    Foldback { drive: f32, threshold: f32 },
}

impl DistortionShape {
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            DistortionShape::HardClip { hardness } => hard_clip(x, hardness),
            DistortionShape::SoftClip => soft_clip(x, 1.0),
            DistortionShape::Tanh { hardness } => tanh_clip(x, hardness),
            DistortionShape::Foldback { drive, threshold } => foldback(x, drive, threshold),
        }
    }
}

/// Memoryless waveshaping distortion
#[derive(Clone, Debug)]
pub struct Distortion {
    shape: DistortionShape,
}

impl Distortion {
    pub fn new(shape: DistortionShape) -> Self {
        Self { shape }
    }

    pub fn hard_clip(hardness: f32) -> Self {
        Self::new(DistortionShape::HardClip { hardness })
    }

    pub fn soft_clip() -> Self {
        Self::new(DistortionShape::SoftClip)
    }

    pub fn tanh(hardness: f32) -> Self {
        Self::new(DistortionShape::Tanh { hardness })
    }

    pub fn foldback(drive: f32, threshold: f32) -> Self {
        Self::new(DistortionShape::Foldback { drive, threshold })
    }
}

impl GraphNode for Distortion {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, _ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        outputs[0] = self.shape.apply(inputs[0]);
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(self.clone())
    }
}
