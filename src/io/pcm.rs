//! Float to signed 16-bit PCM.
//!
//! Samples are clamped to [-1, 1] and scaled by `i16::MAX`, so full scale
//! maps to ±32767 and -32768 is never produced.

#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Interleave per-channel buffers into `out`, frame by frame.
///
/// `out` is cleared first. Every channel must hold at least `frames` samples.
pub fn interleave_into(channels: &[&[f32]], frames: usize, out: &mut Vec<i16>) {
    out.clear();
    out.reserve(frames * channels.len());
    for frame in 0..frames {
        out.extend(channels.iter().map(|c| sample_to_i16(c[frame])));
    }
}

/// Convert an already interleaved float block.
pub fn convert_into(samples: &[f32], out: &mut Vec<i16>) {
    out.clear();
    out.extend(samples.iter().map(|&s| sample_to_i16(s)));
}
