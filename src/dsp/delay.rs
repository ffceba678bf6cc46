use crate::dsp::interpolate::hermite;

/// Circular buffer with fractional-sample reads.
///
/// `write` stores the newest sample; `read(d)` returns the signal `d`
/// samples in the past (0.0 = the sample just written), interpolated with
/// a cubic Hermite spline between neighbouring samples.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Room for delays up to `max_delay_samples`, plus interpolation guard.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples + 4],
            write_pos: 0,
        }
    }

    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 4) as f32
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        self.buffer[self.write_pos] = sample;
    }

    #[inline]
    fn at(&self, age: usize) -> f32 {
        let len = self.buffer.len();
        self.buffer[(self.write_pos + len - age % len) % len]
    }

    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let delay = delay_samples.clamp(0.0, self.max_delay());
        let whole = delay.floor() as usize;
        let frac = delay - whole as f32;

        // x1 is the newer knot, x2 the older one; x0/x3 their outer neighbours
        let x0 = if whole == 0 { self.at(0) } else { self.at(whole - 1) };
        let x1 = self.at(whole);
        let x2 = self.at(whole + 1);
        let x3 = self.at(whole + 2);

        hermite(x0, x1, x2, x3, frac)
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
