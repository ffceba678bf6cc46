//! Waveshaping transfer functions.
//!
//! Each function maps one sample through `f(x * drive)`. With drive near 1.0
//! small signals pass almost untouched; larger drive pushes the signal into
//! the nonlinear region and adds harmonics.
//!
//!   hard_clip   clamp to [-1, 1]             odd harmonics, buzzy
//!   soft_clip   x / (1 + |x|)                gradual, never reaches 1
//!   tanh_clip   tanh(x)                      smooth, tube-like
//!   foldback    reflect at the threshold     metallic, used for sound design

#[inline]
pub fn hard_clip(sample: f32, drive: f32) -> f32 {
    (sample * drive).clamp(-1.0, 1.0)
}

#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    let x = sample * drive;
    x / (1.0 + x.abs())
}

#[inline]
pub fn tanh_clip(sample: f32, drive: f32) -> f32 {
    (sample * drive).tanh()
}

/// Signal folds back on itself when it exceeds `threshold`.
#[inline]
pub fn foldback(sample: f32, drive: f32, threshold: f32) -> f32 {
    let threshold = threshold.max(0.01);
    let mut x = sample * drive;

    while x > threshold || x < -threshold {
        if x > threshold {
            x = 2.0 * threshold - x;
        } else {
            x = -2.0 * threshold - x;
        }
    }

    x
}
