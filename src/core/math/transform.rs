use crate::core::math::normalize_or;
use crate::core::math::rotation::orthogonal_axis;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Builds the matrices fed to the shading stages.
///
/// Everything is right-handed with clip-space depth in [-1, 1], which is what
/// the software rasterizer expects. A GPU host with a [0, 1] depth range
/// composes its own correction into the view-projection before upload.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Uniform scale. Non-uniform scale is deliberately absent: the tangent
    /// frame is transformed with the upper 3x3 of the model matrix, which is
    /// only correct for rotation, translation and uniform scale.
    pub fn scaling(scale: f32) -> Matrix4<f32> {
        Matrix4::new(
            scale, 0.0,   0.0,   0.0,
            0.0,   scale, 0.0,   0.0,
            0.0,   0.0,   scale, 0.0,
            0.0,   0.0,   0.0,   1.0,
        )
    }

    /// Object placement: translate * Rz * Ry * Rx * scale. Angles in degrees.
    pub fn model(position: &Vector3<f32>, rotation_deg: &Vector3<f32>, scale: f32) -> Matrix4<f32> {
        Self::translation(position)
            * Self::rotation_z(rotation_deg.z.to_radians())
            * Self::rotation_y(rotation_deg.y.to_radians())
            * Self::rotation_x(rotation_deg.x.to_radians())
            * Self::scaling(scale)
    }

    /// Look-at view matrix; the camera looks down its local -Z.
    ///
    /// An `up` parallel to the view direction is replaced by an arbitrary
    /// perpendicular, as is a target sitting on the eye.
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        let z_axis = normalize_or(eye - target, Vector3::z());
        let x_axis = normalize_or(up.cross(&z_axis), orthogonal_axis(&z_axis));
        let y_axis = z_axis.cross(&x_axis);

        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        rotation * Self::translation(&-eye.coords)
    }

    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let nf = 1.0 / (near - far);

        Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,               0.0,
            0.0,              f,   0.0,               0.0,
            0.0,              0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,              0.0, -1.0,              0.0,
        )
    }

    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);

        Matrix4::new(
            2.0 * rl, 0.0,      0.0,      -(right + left) * rl,
            0.0,      2.0 * tb, 0.0,      -(top + bottom) * tb,
            0.0,      0.0,      2.0 * nf, (far + near) * nf,
            0.0,      0.0,      0.0,      1.0,
        )
    }
}

/// Upper-left 3x3 of a model matrix, used as the normal/tangent transform.
#[inline]
pub fn upper_3x3(m: &Matrix4<f32>) -> Matrix3<f32> {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

//=================================
// Core Transformation Functions
//=================================

/// Clip space to NDC.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// NDC to pixel coordinates. NDC +Y is up, screen +Y is down.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - (ndc_y + 1.0) * 0.5) * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::test_util::{TOLERANCE, assert_vec_eq};

    #[test]
    fn view_survives_up_parallel_to_view_direction() {
        let eye = Point3::new(0.0, 5.0, 0.0);
        let view = TransformFactory::view(&eye, &Point3::origin(), &Vector3::y());
        assert!(view.iter().all(|x| x.is_finite()));

        let rotation = view.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((rotation * rotation.transpose() - Matrix3::identity()).abs().max() < TOLERANCE);
        // The origin lands straight ahead, five units down -Z.
        let p = view * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_vec_eq(p.xyz(), Vector3::new(0.0, 0.0, -5.0), TOLERANCE);
    }

    #[test]
    fn model_orders_scale_rotate_translate() {
        let m = TransformFactory::model(
            &Vector3::new(1.0, 2.0, 3.0),
            &Vector3::new(0.0, 90.0, 0.0),
            2.0,
        );
        let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) scaled to (2,0,0), turned about +Y to (0,0,-2), then moved.
        assert_vec_eq(p.xyz(), Vector3::new(1.0, 2.0, 1.0), TOLERANCE);
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let eye = Point3::new(0.0, 2.0, 5.0);
        let view = TransformFactory::view(&eye, &Point3::origin(), &Vector3::y());
        let p = view * eye.to_homogeneous();
        assert_vec_eq(p.xyz(), Vector3::zeros(), TOLERANCE);
    }

    #[test]
    fn perspective_maps_near_plane_to_minus_one() {
        let proj = TransformFactory::perspective(1.0, 90f32.to_radians(), 0.5, 10.0);
        let clip = proj * Vector4::new(0.0, 0.0, -0.5, 1.0);
        let ndc = apply_perspective_division(&clip);
        assert!((ndc.z + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn screen_y_is_flipped() {
        let top = ndc_to_screen(0.0, 1.0, 100.0, 50.0);
        assert_eq!(top, Point2::new(50.0, 0.0));
    }
}
