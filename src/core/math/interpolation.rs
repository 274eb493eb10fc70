use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Screen-space barycentric weights of `p` in triangle `(v1, v2, v3)`.
///
/// `None` for triangles with (near) zero area.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let to_p = p - v1;

    let area_x2 = e1.x * e2.y - e1.y * e2.x;
    if area_x2.abs() < EPSILON {
        return None;
    }
    let inv_area_x2 = 1.0 / area_x2;

    let beta = (to_p.x * e2.y - to_p.y * e2.x) * inv_area_x2;
    let gamma = (e1.x * to_p.y - e1.y * to_p.x) * inv_area_x2;

    Some(Vector3::new(1.0 - beta - gamma, beta, gamma))
}

#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// Reweights screen-space barycentrics by `1/w` so attributes interpolate
/// linearly in clip space rather than in screen space.
///
/// `None` when the weighted sum collapses to zero.
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w1: f32,
    w2: f32,
    w3: f32,
) -> Option<Vector3<f32>> {
    let inv_w = |w: f32| if w.abs() > EPSILON { 1.0 / w } else { 1.0 };
    let weighted = Vector3::new(bary.x * inv_w(w1), bary.y * inv_w(w2), bary.z * inv_w(w3));

    let sum = weighted.x + weighted.y + weighted.z;
    if sum.abs() < EPSILON {
        return None;
    }
    Some(weighted / sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_get_unit_weights() {
        let (a, b, c) = (
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        );
        let w = barycentric_coordinates(b, a, b, c).unwrap();
        assert!((w - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert!(is_inside_triangle(w));
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let p = Point2::new(1.0, 1.0);
        let v = Point2::new(2.0, 2.0);
        assert!(barycentric_coordinates(p, v, v, Point2::new(3.0, 3.0)).is_none());
    }

    #[test]
    fn equal_depths_leave_weights_unchanged() {
        let bary = Vector3::new(0.2, 0.3, 0.5);
        let corrected = perspective_correct_barycentric(bary, 2.0, 2.0, 2.0).unwrap();
        assert!((corrected - bary).norm() < 1e-6);
    }
}
