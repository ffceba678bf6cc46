use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/// Curve of a [`FadeEnvelope`] over elapsed seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FadeCurve {
    /// 1.0 up to and including `time`, then 0.0.
    Hold { time: f64 },
    /// Linear 0.0 → 1.0 over `duration`, then 1.0.
    FadeIn { duration: f64 },
    /// Linear 1.0 → 0.0 over `duration`, then 0.0.
    FadeOut { duration: f64 },
    /// `exp(-t / decay)`.
    ExpFalloff { decay: f64 },
}

impl FadeCurve {
    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            FadeCurve::Hold { time } => {
                if t <= time {
                    1.0
                } else {
                    0.0
                }
            }
            FadeCurve::FadeIn { duration } => ramp(t, duration),
            FadeCurve::FadeOut { duration } => 1.0 - ramp(t, duration),
            FadeCurve::ExpFalloff { decay } => (-t / decay).exp(),
        }
    }
}

fn ramp(t: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        1.0
    } else {
        (t / duration).clamp(0.0, 1.0)
    }
}

/// Gate-less envelope: a fixed function of the time since the last reset.
/// 0 inputs, 1 output. The clock advances before the curve is read.
#[derive(Debug, Clone)]
pub struct FadeEnvelope {
    curve: FadeCurve,
    elapsed: f64,
}

impl FadeEnvelope {
    pub fn new(curve: FadeCurve) -> Self {
        Self { curve, elapsed: 0.0 }
    }

    pub fn hold(time: f64) -> Self {
        Self::new(FadeCurve::Hold { time })
    }

    pub fn fade_in(duration: f64) -> Self {
        Self::new(FadeCurve::FadeIn { duration })
    }

    pub fn fade_out(duration: f64) -> Self {
        Self::new(FadeCurve::FadeOut { duration })
    }

    pub fn exp_falloff(decay: f64) -> Self {
        Self::new(FadeCurve::ExpFalloff { decay })
    }

    pub fn curve(&self) -> FadeCurve {
        self.curve
    }
}

impl GraphNode for FadeEnvelope {
    fn input_count(&self) -> usize {
        0
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, _inputs: &[f32], outputs: &mut [f32]) {
        self.elapsed += ctx.time_step();
        outputs[0] = self.curve.value_at(self.elapsed) as f32;
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(self.curve))
    }
}
