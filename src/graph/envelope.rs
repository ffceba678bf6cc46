use crate::dsp::envelope::{gate_is_high, Adsr, AdsrParams, AdsrStage, Shape, ShapeCursor};
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/// A node whose output dies away some time after its gate falls.
///
/// `time_to_silence(release_moment)` answers: if the gate drops
/// `release_moment` seconds after the note started, how many seconds after
/// that will the output reach silence? The voice player sizes release
/// tails from the largest answer among a voice's envelopes.
pub trait Envelope: GraphNode {
    fn time_to_silence(&self, release_moment: f64) -> f64;
}

/// ADSR envelope, `gate -> level`.
#[derive(Debug, Clone)]
pub struct AdsrNode {
    adsr: Adsr,
}

impl AdsrNode {
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self::from_params(AdsrParams {
            attack,
            decay,
            sustain,
            release,
        })
    }

    pub fn from_params(params: AdsrParams) -> Self {
        Self {
            adsr: Adsr::new(params),
        }
    }

    pub fn params(&self) -> &AdsrParams {
        self.adsr.params()
    }

    pub fn stage(&self) -> AdsrStage {
        self.adsr.stage()
    }
}

impl GraphNode for AdsrNode {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        outputs[0] = self.adsr.next(inputs[0] as f64, ctx.time_step()) as f32;
    }

    fn reset(&mut self) {
        self.adsr.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::from_params(*self.adsr.params()))
    }
}

impl Envelope for AdsrNode {
    fn time_to_silence(&self, release_moment: f64) -> f64 {
        self.adsr.time_to_silence(release_moment)
    }
}

/// Plays a [`Shape`] once from the last reset. The gate input is accepted
/// for wiring compatibility and ignored.
#[derive(Debug, Clone)]
pub struct ShapeEnvelope {
    shape: Shape,
    cursor: ShapeCursor,
    elapsed: f64,
}

impl ShapeEnvelope {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            cursor: ShapeCursor::default(),
            elapsed: 0.0,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl GraphNode for ShapeEnvelope {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, _inputs: &[f32], outputs: &mut [f32]) {
        outputs[0] = self.cursor.value_at(&self.shape, self.elapsed) as f32;
        self.elapsed += ctx.time_step();
    }

    fn reset(&mut self) {
        self.cursor.reset();
        self.elapsed = 0.0;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(self.shape.clone()))
    }
}

impl Envelope for ShapeEnvelope {
    fn time_to_silence(&self, release_moment: f64) -> f64 {
        (self.shape.duration() - release_moment).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Attack,
    Release,
}

/*
Gate-Controlled Shapes
======================

Two shapes, one switch:

  gate ↑  →  play the attack shape from the start
  gate ↓  →  play the release shape from the start (if there is one)

Whichever shape starts, it starts from the value the envelope is putting out
at that moment, so switching never jumps:

  Level
    1.0 ┐    ╱‾‾‾‾‾‾╲
        │   ╱        ╲__
        │  ╱            ╲___
    0.0 └─╱─────────────────╲──→ Time
          ↑ attack   ↑ release
         gate ↑     gate ↓

Before the first rising edge the output is 0. Without a release shape a
falling edge changes nothing and the attack shape plays on.

Restarting the attack shape after a retrigger moves the shape's time origin
back to zero. The cursor walks back to the first section rather than being
rebuilt.
*/

#[derive(Debug, Clone)]
pub struct ControlledShapeEnvelope {
    attack: Shape,
    release: Option<Shape>,

    active: Option<Active>,
    cursor: ShapeCursor,
    origin: f64,
    elapsed: f64,
    value: f64,
    gate_high: bool,
}

impl ControlledShapeEnvelope {
    pub fn new(attack: Shape, release: Option<Shape>) -> Self {
        Self {
            attack,
            release,
            active: None,
            cursor: ShapeCursor::default(),
            origin: 0.0,
            elapsed: 0.0,
            value: 0.0,
            gate_high: false,
        }
    }

    fn start(&mut self, which: Active) {
        if self.active != Some(which) {
            self.cursor.reset();
        }
        self.active = Some(which);
        self.cursor.start_value = self.value;
        self.origin = self.elapsed;
    }
}

impl GraphNode for ControlledShapeEnvelope {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let high = gate_is_high(inputs[0] as f64);
        if high && !self.gate_high {
            self.start(Active::Attack);
        } else if !high && self.gate_high && self.release.is_some() {
            self.start(Active::Release);
        }
        self.gate_high = high;

        let local = self.elapsed - self.origin;
        self.value = match self.active {
            Some(Active::Attack) => self.cursor.value_at(&self.attack, local),
            Some(Active::Release) => match &self.release {
                Some(shape) => self.cursor.value_at(shape, local),
                None => 0.0,
            },
            None => 0.0,
        };
        self.elapsed += ctx.time_step();

        outputs[0] = self.value as f32;
    }

    fn reset(&mut self) {
        self.active = None;
        self.cursor.reset();
        self.origin = 0.0;
        self.elapsed = 0.0;
        self.value = 0.0;
        self.gate_high = false;
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(self.attack.clone(), self.release.clone()))
    }
}

impl Envelope for ControlledShapeEnvelope {
    fn time_to_silence(&self, release_moment: f64) -> f64 {
        match &self.release {
            Some(shape) => shape.duration(),
            None => (self.attack.duration() - release_moment).max(0.0),
        }
    }
}
