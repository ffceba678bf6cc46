use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::dsp::interpolate::hermite;
use crate::graph::delay::ModulatedDelay;
use crate::graph::node::{BoxedNode, GraphNode, RenderCtx};

/*
Chorus Effect
=============

Chorus thickens a sound by mixing the dry signal with several slightly
delayed copies whose delay times keep drifting. Each drifting delay shifts
the pitch a tiny bit up or down, so one voice sounds like a small ensemble.

How It Works
------------

1. The input is written into one shared delay line (a ModulatedDelay)
2. Every chorus voice reads its own tap from that line
3. Each tap's delay wanders slowly and unpredictably
4. The taps are averaged (wet) and blended with the input (dry)

  input ──┬──────────────────────────────┐
          │                              │ dry * (1 - mix)
          └──→ [ModulatedDelay] ── avg ──┴──→ output
                    ↑  ↑  ↑            wet * mix
                   s₁ s₂ s₃  (one drifting delay per voice)

Drift
-----

Tap i sits at a base delay of separation * (i + 1) and wanders by up to
±variance around it:

  delay_i(t) = separation * (i + 1) + variance * s_i(t)

s_i is a Catmull-Rom spline through random control points in [-1, 1],
one point every 1 / modulation_speed seconds. Unlike an LFO, the spline
never repeats, so the voices never fall into a recognisable beat pattern.
The control points come from a generator forked off the render context in
`init`, so a given seed always produces the same chorus.

Parameters
----------

voice_count       number of delayed copies (2-4 is typical)
separation        seconds between neighbouring voices' base delays (~0.01)
variance          seconds of drift around each base delay (~0.002)
modulation_speed  control points per second (0.5 - 3)
mix               0.0 = dry only, 1.0 = wet only

Example usage:

  let lush = OscNode::saw().through(ChorusNode::new(3, 0.012, 0.003, 1.5, 0.4))?;
*/

/// Control-point spline driving one chorus voice.
#[derive(Debug, Clone, Default)]
struct Drift {
    points: [f32; 4],
    position: f64,
}

impl Drift {
    fn seed(&mut self, rng: &mut StdRng) {
        for point in &mut self.points {
            *point = rng.gen_range(-1.0..=1.0);
        }
        self.position = 0.0;
    }

    #[inline]
    fn value(&self) -> f32 {
        let [p0, p1, p2, p3] = self.points;
        hermite(p0, p1, p2, p3, self.position as f32)
    }

    #[inline]
    fn advance(&mut self, step: f64, rng: &mut StdRng) {
        self.position += step;
        while self.position >= 1.0 {
            self.position -= 1.0;
            self.points.rotate_left(1);
            self.points[3] = rng.gen_range(-1.0..=1.0);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChorusNode {
    voice_count: usize,
    separation: f64,
    variance: f64,
    modulation_speed: f64,
    mix: f32,

    delay: ModulatedDelay,
    drift: Vec<Drift>,
    rng: StdRng,
    taps: Vec<f32>,
}

impl ChorusNode {
    pub fn new(
        voice_count: usize,
        separation: f64,
        variance: f64,
        modulation_speed: f64,
        mix: f32,
    ) -> Self {
        let voice_count = voice_count.max(1);
        let max_delay = separation * voice_count as f64 + variance;

        Self {
            voice_count,
            separation,
            variance,
            modulation_speed,
            mix: mix.clamp(0.0, 1.0),
            delay: ModulatedDelay::new(voice_count, max_delay),
            drift: vec![Drift::default(); voice_count],
            rng: StdRng::seed_from_u64(0),
            taps: vec![0.0; voice_count + 1],
        }
    }

    pub fn voice_count(&self) -> usize {
        self.voice_count
    }
}

impl GraphNode for ChorusNode {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        self.delay.init(ctx);
        self.rng = ctx.fork_rng();
        for drift in &mut self.drift {
            drift.seed(&mut self.rng);
        }
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        let dry = inputs[0];
        let step = self.modulation_speed * ctx.time_step();

        self.taps[0] = dry;
        for (i, drift) in self.drift.iter_mut().enumerate() {
            let base = self.separation * (i + 1) as f64;
            self.taps[i + 1] = (base + self.variance * drift.value() as f64).max(0.0) as f32;
            drift.advance(step, &mut self.rng);
        }

        let mut sum = [0.0];
        self.delay.process(ctx, &self.taps, &mut sum);
        let wet = sum[0] / self.voice_count as f32;

        outputs[0] = dry * (1.0 - self.mix) + wet * self.mix;
    }

    fn reset(&mut self) {
        self.delay.reset();
    }

    fn clone_state(&self) -> BoxedNode {
        Box::new(self.clone())
    }

    fn clone_fresh(&self) -> BoxedNode {
        Box::new(Self::new(
            self.voice_count,
            self.separation,
            self.variance,
            self.modulation_speed,
            self.mix,
        ))
    }
}
