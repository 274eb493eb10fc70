use crate::core::math::normalize_or;
use nalgebra::{Matrix3, Vector3};

/// Skew-symmetric matrix `[v]x` such that `[v]x * w == v.cross(w)`.
#[rustfmt::skip]
#[inline]
pub fn cross_product_matrix(v: &Vector3<f32>) -> Matrix3<f32> {
    Matrix3::new(
        0.0,  -v.z,  v.y,
        v.z,   0.0, -v.x,
       -v.y,   v.x,  0.0,
    )
}

/// Rotation taking unit vector `from` onto the direction of `to`.
///
/// Uses the vector-to-vector form of Rodrigues' formula,
/// `R = I + [v]x + [v]x^2 / (1 + a.b)` with `v = a x b`.
///
/// The formula only runs for `a.b >= 0`, where `1 + a.b >= 1`. An obtuse pair
/// is first flipped by a half turn about an axis orthogonal to `from`, so an
/// exactly opposite `to` yields that half turn. A zero `to` yields the identity,
/// leaving the glyph on its canonical axis.
pub fn rotation_between(from: &Vector3<f32>, to: &Vector3<f32>) -> Matrix3<f32> {
    let a = normalize_or(*from, Vector3::y());
    let b = normalize_or(*to, a);

    if a.dot(&b) < 0.0 {
        let flip = half_turn_about(&orthogonal_axis(&a));
        return rodrigues(&-a, &b) * flip;
    }
    rodrigues(&a, &b)
}

/// Unit `a` onto unit `b` for `a.b >= 0`.
fn rodrigues(a: &Vector3<f32>, b: &Vector3<f32>) -> Matrix3<f32> {
    let skew = cross_product_matrix(&a.cross(b));
    Matrix3::identity() + skew + skew * skew * (1.0 / (1.0 + a.dot(b)))
}

/// 180 degree rotation about unit axis `k`: `2 k k^T - I`.
pub fn half_turn_about(k: &Vector3<f32>) -> Matrix3<f32> {
    k * k.transpose() * 2.0 - Matrix3::identity()
}

/// Any unit vector perpendicular to unit vector `a`.
pub fn orthogonal_axis(a: &Vector3<f32>) -> Vector3<f32> {
    // Crossing with the least aligned basis vector keeps the result well conditioned.
    let helper = if a.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::z()
    };
    normalize_or(a.cross(&helper), Vector3::z())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::test_util::{TOLERANCE, assert_vec_eq};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_unit(rng: &mut StdRng) -> Vector3<f32> {
        loop {
            let v = Vector3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            if v.norm_squared() > 0.01 {
                return v.normalize();
            }
        }
    }

    #[test]
    fn maps_from_onto_to() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut checked = 0;
        while checked < 500 {
            let a = random_unit(&mut rng);
            let b = random_unit(&mut rng);
            let r = rotation_between(&a, &b);
            assert_vec_eq(r * a, b, TOLERANCE);
            checked += 1;
        }
    }

    #[test]
    fn nearly_opposite_directions_stay_accurate() {
        let mut rng = StdRng::seed_from_u64(0xa11);
        for _ in 0..500 {
            let a = random_unit(&mut rng);
            let jitter = random_unit(&mut rng) * rng.random_range(1e-6f32..1e-2);
            let b = (-a + jitter).normalize();
            let r = rotation_between(&a, &b);
            assert_vec_eq(r * a, b, TOLERANCE);
            assert!((r.determinant() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn glyph_pointing_almost_down() {
        for eps in [1e-2, 1e-3, 1e-4, 1e-6] {
            let b = Vector3::new(eps, -1.0, 0.0).normalize();
            let r = rotation_between(&Vector3::y(), &b);
            assert_vec_eq(r * Vector3::y(), b, TOLERANCE);
        }
    }

    #[test]
    fn result_is_a_proper_rotation() {
        let a = Vector3::y();
        let b = Vector3::new(1.0, 2.0, -0.5).normalize();
        let r = rotation_between(&a, &b);
        let should_be_identity = r * r.transpose();
        assert!((should_be_identity - Matrix3::identity()).abs().max() < TOLERANCE);
        assert!((r.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn parallel_directions_give_identity() {
        let r = rotation_between(&Vector3::y(), &Vector3::new(0.0, 3.0, 0.0));
        assert!((r - Matrix3::identity()).abs().max() < TOLERANCE);
    }

    #[test]
    fn antiparallel_direction_uses_half_turn() {
        let r = rotation_between(&Vector3::y(), &-Vector3::y());
        assert!(r.iter().all(|x| x.is_finite()));
        assert_vec_eq(r * Vector3::y(), -Vector3::y(), TOLERANCE);
        assert!((r.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn antiparallel_along_x_uses_other_helper() {
        let r = rotation_between(&Vector3::x(), &-Vector3::x());
        assert_vec_eq(r * Vector3::x(), -Vector3::x(), TOLERANCE);
    }

    #[test]
    fn zero_target_gives_identity() {
        let r = rotation_between(&Vector3::y(), &Vector3::zeros());
        assert!((r - Matrix3::identity()).abs().max() < TOLERANCE);
    }

    #[test]
    fn skew_matrix_matches_cross_product() {
        let v = Vector3::new(0.3, -1.2, 2.0);
        let w = Vector3::new(-0.7, 0.1, 0.4);
        assert_vec_eq(cross_product_matrix(&v) * w, v.cross(&w), TOLERANCE);
    }
}
