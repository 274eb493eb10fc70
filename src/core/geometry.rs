use crate::core::math::transform::upper_3x3;
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

/// A single mesh sample in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub texcoord: Vector2<f32>,
    /// Unit length and orthogonal to `normal` once the mesh has tangents.
    pub tangent: Vector3<f32>,
    pub bitangent: Vector3<f32>,
}

impl Vertex {
    /// Vertex without a tangent frame; see `Mesh::compute_tangents`.
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            texcoord,
            tangent: Vector3::zeros(),
            bitangent: Vector3::zeros(),
        }
    }

    pub fn with_tangent_frame(mut self, tangent: Vector3<f32>, bitangent: Vector3<f32>) -> Self {
        self.tangent = tangent;
        self.bitangent = bitangent;
        self
    }
}

/// Geometry transform shared by every pipeline variant.
///
/// Returns `(clip, world)` with `world = M * [p, 1]` and `clip = VP * world`.
/// A singular `model` is the caller's problem; nothing is validated here.
#[inline]
pub fn transform_position(
    position: &Point3<f32>,
    model: &Matrix4<f32>,
    view_projection: &Matrix4<f32>,
) -> (Vector4<f32>, Point3<f32>) {
    let world = model * position.to_homogeneous();
    let clip = view_projection * world;
    (clip, Point3::from(world.xyz()))
}

/// Transforms a direction by the upper 3x3 of `model`, without normalizing.
#[inline]
pub fn transform_direction(direction: &Vector3<f32>, model: &Matrix4<f32>) -> Vector3<f32> {
    upper_3x3(model) * direction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::test_util::{TOLERANCE, assert_vec_eq};
    use crate::core::math::transform::TransformFactory;

    #[test]
    fn world_and_clip_follow_model_then_view_projection() {
        let model = TransformFactory::translation(&Vector3::new(1.0, 0.0, 0.0));
        let vp = TransformFactory::scaling(2.0);
        let (clip, world) = transform_position(&Point3::new(0.0, 1.0, 0.0), &model, &vp);
        assert_vec_eq(world.coords, Vector3::new(1.0, 1.0, 0.0), TOLERANCE);
        assert_vec_eq(clip.xyz(), Vector3::new(2.0, 2.0, 0.0), TOLERANCE);
        assert_eq!(clip.w, 1.0);
    }

    #[test]
    fn directions_ignore_translation() {
        let model = TransformFactory::translation(&Vector3::new(5.0, 5.0, 5.0));
        let d = transform_direction(&Vector3::z(), &model);
        assert_vec_eq(d, Vector3::z(), TOLERANCE);
    }
}
