/// Paul Kellet's refined pinking filter.
///
/// Six leaky one-pole integrators at staggered frequencies approximate a
/// -3 dB/octave slope. White noise in, pink noise out; two in series give
/// a brown-ish -6 dB/octave spectrum.
#[derive(Debug, Clone, Default)]
pub struct PinkingFilter {
    b: [f64; 7],
}

impl PinkingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let x = input as f64;
        let b = &mut self.b;

        b[0] = 0.99886 * b[0] + x * 0.0555179;
        b[1] = 0.99332 * b[1] + x * 0.0750759;
        b[2] = 0.96900 * b[2] + x * 0.1538520;
        b[3] = 0.86650 * b[3] + x * 0.3104856;
        b[4] = 0.55000 * b[4] + x * 0.5329522;
        b[5] = -0.7616 * b[5] - x * 0.0168980;

        let out = (b.iter().sum::<f64>() + x * 0.5362) * 0.115830421;
        b[6] = x * 0.115926;

        out as f32
    }

    pub fn reset(&mut self) {
        self.b = [0.0; 7];
    }
}
