pub mod interpolation;
pub mod rotation;
pub mod transform;

use nalgebra::Vector3;

/// Squared length below which a vector is treated as zero.
pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

/// Normalizes `v`, substituting `fallback` for zero-length or non-finite input.
///
/// Shading stages cannot report errors mid-frame, so every normalize on the
/// per-invocation path goes through here instead of producing NaN.
#[inline]
pub fn normalize_or(v: Vector3<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    let len_sq = v.norm_squared();
    if !len_sq.is_finite() || len_sq < DEGENERATE_LENGTH_SQUARED {
        return fallback;
    }
    v / len_sq.sqrt()
}

#[cfg(test)]
pub(crate) mod test_util {
    use nalgebra::Vector3;

    pub const TOLERANCE: f32 = 1e-5;

    pub fn assert_vec_eq(actual: Vector3<f32>, expected: Vector3<f32>, tol: f32) {
        let diff = (actual - expected).abs().max();
        assert!(
            diff <= tol,
            "expected {:?}, got {:?} (max diff {})",
            expected,
            actual,
            diff
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_or_keeps_direction() {
        let n = normalize_or(Vector3::new(3.0, 0.0, 4.0), Vector3::z());
        test_util::assert_vec_eq(n, Vector3::new(0.6, 0.0, 0.8), test_util::TOLERANCE);
    }

    #[test]
    fn normalize_or_substitutes_fallback_for_zero() {
        let n = normalize_or(Vector3::zeros(), Vector3::z());
        assert_eq!(n, Vector3::z());
    }

    #[test]
    fn normalize_or_substitutes_fallback_for_nan() {
        let n = normalize_or(Vector3::new(f32::NAN, 0.0, 0.0), Vector3::y());
        assert_eq!(n, Vector3::y());
    }
}
