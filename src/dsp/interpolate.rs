//! Fractional interpolation helpers.

/// Cubic Hermite (Catmull-Rom) interpolation between `x1` and `x2`.
///
/// `x0` and `x3` are the outer neighbours, `t` in [0, 1).
#[inline]
pub fn hermite(x0: f32, x1: f32, x2: f32, x3: f32, t: f32) -> f32 {
    x1 + 0.5
        * t
        * (x2 - x0 + t * (2.0 * x0 - 5.0 * x1 + 4.0 * x2 - x3 + t * (3.0 * (x1 - x2) + x3 - x0)))
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Exponential interpolation: linear in the log domain. Both ends must be > 0.
#[inline]
pub fn xerp(a: f64, b: f64, t: f64) -> f64 {
    (a.ln() + (b.ln() - a.ln()) * t).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hermite_hits_the_knots() {
        assert_eq!(hermite(0.0, 1.0, 2.0, 3.0, 0.0), 1.0);
        assert!((hermite(0.0, 1.0, 2.0, 3.0, 0.999_999) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn hermite_is_exact_on_lines() {
        // A straight line is reproduced exactly
        let y = hermite(0.0, 1.0, 2.0, 3.0, 0.25);
        assert!((y - 1.25).abs() < 1e-6);
    }

    #[test]
    fn xerp_is_geometric_midpoint() {
        assert!((xerp(0.5, 2.0, 0.5) - 1.0).abs() < 1e-12);
    }
}
