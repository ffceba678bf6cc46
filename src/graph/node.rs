use rand::{rngs::StdRng, Rng, SeedableRng};

/// Owned, type-erased graph node.
pub type BoxedNode = Box<dyn GraphNode>;

/// Sample clock and random stream for one render session.
///
/// - sample_rate: fixed for the session (e.g. 44100)
/// - time_step:   1 / sample_rate, in seconds
/// - time:        elapsed seconds, always `sample_count * time_step`
/// - rng:         seeded stream that nodes fork from in `init`
///
/// Cloning gives an independent session at the same clock position. The
/// clone's random stream starts from the same state but advances on its own.
#[derive(Debug, Clone)]
pub struct RenderCtx {
    sample_rate: u32,
    time_step: f64,
    time: f64,
    sample_count: u64,
    rng: StdRng,
}

impl RenderCtx {
    pub fn new(sample_rate: u32, seed: u64) -> Self {
        Self {
            sample_rate,
            time_step: 1.0 / sample_rate as f64,
            time: 0.0,
            sample_count: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Advance the clock by exactly one sample.
    #[inline]
    pub fn tick(&mut self) {
        self.sample_count += 1;
        self.time = self.sample_count as f64 * self.time_step;
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Derive an independent generator from the session stream.
    pub fn fork_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }
}

/// Core trait for signal graph nodes
///
/// A node has a fixed number of inputs and outputs for its whole lifetime.
/// `process` runs once per sample tick: it reads exactly `input_count()`
/// values and writes exactly `output_count()` values. The only side effect
/// allowed is on the node's own state.
pub trait GraphNode: Send {
    fn input_count(&self) -> usize;

    fn output_count(&self) -> usize;

    /// One-time, sample-rate dependent setup. Called once before the first
    /// `process`. Composite nodes forward it to every child.
    fn init(&mut self, _ctx: &mut RenderCtx) {
        // Default: nothing to prepare
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]);

    /// Restore the initial runtime state. Configuration is untouched.
    fn reset(&mut self) {
        // Default: stateless node
    }

    /// Deep copy including in-flight runtime state.
    fn clone_state(&self) -> BoxedNode;

    /// Same configuration with fresh runtime state.
    fn clone_fresh(&self) -> BoxedNode;
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for BoxedNode {
    fn input_count(&self) -> usize {
        (**self).input_count()
    }

    fn output_count(&self) -> usize {
        (**self).output_count()
    }

    fn init(&mut self, ctx: &mut RenderCtx) {
        (**self).init(ctx)
    }

    fn process(&mut self, ctx: &RenderCtx, inputs: &[f32], outputs: &mut [f32]) {
        (**self).process(ctx, inputs, outputs)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn clone_state(&self) -> BoxedNode {
        (**self).clone_state()
    }

    fn clone_fresh(&self) -> BoxedNode {
        (**self).clone_fresh()
    }
}
