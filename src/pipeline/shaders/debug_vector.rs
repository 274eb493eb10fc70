//! Instanced arrow glyphs that visualize directions at points.
//!
//! Every instance reads one [`DebugVectorRecord`], rotates the canonical
//! glyph from +Y onto the record's direction, shrinks it by the glyph scale
//! and moves it to the record's position. The result then goes through the
//! same model and view-projection transform as any other mesh.

use crate::core::color::opaque;
use crate::core::geometry::{Vertex, transform_position};
use crate::core::layout::DebugVectorRecord;
use crate::core::math::rotation::rotation_between;
use crate::core::pipeline::Shader;
use crate::scene::camera::CameraState;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

/// Shrink factor for glyphs authored at unit length.
pub const GLYPH_SCALE: f32 = 0.0004;

/// The direction the canonical glyph points along.
pub const CANONICAL_AXIS: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Rotation aligning [`CANONICAL_AXIS`] with `direction`. Never NaN.
#[inline]
pub fn glyph_rotation(direction: &Vector3<f32>) -> Matrix3<f32> {
    rotation_between(&CANONICAL_AXIS, direction)
}

pub struct DebugVectorShader<'a> {
    pub camera: CameraState,
    pub model: Matrix4<f32>,
    pub records: &'a [DebugVectorRecord],
    pub glyph_scale: f32,
    pub color: Vector3<f32>,
}

impl<'a> DebugVectorShader<'a> {
    pub fn new(
        camera: CameraState,
        model: Matrix4<f32>,
        records: &'a [DebugVectorRecord],
        color: Vector3<f32>,
    ) -> Self {
        Self {
            camera,
            model,
            records,
            glyph_scale: GLYPH_SCALE,
            color,
        }
    }

    pub fn with_glyph_scale(mut self, glyph_scale: f32) -> Self {
        self.glyph_scale = glyph_scale;
        self
    }

    pub fn instance_count(&self) -> u32 {
        self.records.len() as u32
    }

    /// Object-space glyph vertex placed by one record, before the model matrix.
    pub fn place(&self, position: &Point3<f32>, record: &DebugVectorRecord) -> Point3<f32> {
        let rotation = glyph_rotation(&record.direction());
        record.position() + rotation * position.coords * self.glyph_scale
    }
}

impl Shader for DebugVectorShader<'_> {
    type Varying = Vector3<f32>;

    fn vertex(&self, vertex: &Vertex, instance: u32) -> (Vector4<f32>, Self::Varying) {
        // An instance without a record collapses to w = 0 and is discarded.
        let Some(record) = self.records.get(instance as usize) else {
            return (Vector4::zeros(), self.color);
        };
        let local = self.place(&vertex.position, record);
        let (clip, _) = transform_position(&local, &self.model, &self.camera.view_projection);
        (clip, self.color)
    }

    fn fragment(&self, varying: Self::Varying) -> Vector4<f32> {
        opaque(varying)
    }
}

/// One record array per basis vector, each anchored at the vertices of a mesh.
#[derive(Debug, Clone, Default)]
pub struct TbnRecords {
    pub tangents: Vec<DebugVectorRecord>,
    pub bitangents: Vec<DebugVectorRecord>,
    pub normals: Vec<DebugVectorRecord>,
}

impl TbnRecords {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut records = Self {
            tangents: Vec::with_capacity(mesh.vertices.len()),
            bitangents: Vec::with_capacity(mesh.vertices.len()),
            normals: Vec::with_capacity(mesh.vertices.len()),
        };
        for v in &mesh.vertices {
            records.tangents.push(DebugVectorRecord::new(v.position, v.tangent));
            records.bitangents.push(DebugVectorRecord::new(v.position, v.bitangent));
            records.normals.push(DebugVectorRecord::new(v.position, v.normal));
        }
        records
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::test_util::{TOLERANCE, assert_vec_eq};
    use nalgebra::Vector2;

    fn camera() -> CameraState {
        CameraState {
            view_position: Point3::new(0.0, 0.0, 5.0),
            view_projection: Matrix4::identity(),
        }
    }

    #[test]
    fn straight_down_rotation_is_finite_and_flips_axis() {
        let rotation = glyph_rotation(&Vector3::new(0.0, -1.0, 0.0));
        assert!(rotation.iter().all(|x| x.is_finite()));
        assert_vec_eq(rotation * CANONICAL_AXIS, -Vector3::y(), TOLERANCE);
        assert!((rotation.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn glyph_tip_lands_along_direction() {
        let records = [DebugVectorRecord::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(10.0, 0.0, 0.0),
        )];
        let shader = DebugVectorShader::new(camera(), Matrix4::identity(), &records, Vector3::x())
            .with_glyph_scale(0.5);
        let tip = Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::y(), Vector2::zeros());

        let (clip, color) = shader.vertex(&tip, 0);
        assert_vec_eq(clip.xyz(), Vector3::new(1.5, 2.0, 3.0), TOLERANCE);
        assert_eq!(clip.w, 1.0);
        assert_eq!(color, Vector3::x());
    }

    #[test]
    fn default_scale_shrinks_unit_glyph() {
        let records = [DebugVectorRecord::new(Point3::origin(), Vector3::z())];
        let shader = DebugVectorShader::new(camera(), Matrix4::identity(), &records, Vector3::x());
        let placed = shader.place(&Point3::new(0.0, 1.0, 0.0), &records[0]);
        assert_vec_eq(placed.coords, Vector3::new(0.0, 0.0, GLYPH_SCALE), 1e-9);
    }

    #[test]
    fn antiparallel_instance_produces_finite_clip() {
        let records = [DebugVectorRecord::new(Point3::origin(), Vector3::new(0.0, -3.0, 0.0))];
        let shader = DebugVectorShader::new(camera(), Matrix4::identity(), &records, Vector3::x());
        let mesh = Mesh::create_arrow(8);
        for v in &mesh.vertices {
            let (clip, _) = shader.vertex(v, 0);
            assert!(clip.iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn missing_record_is_degenerate() {
        let shader = DebugVectorShader::new(camera(), Matrix4::identity(), &[], Vector3::x());
        let v = Vertex::new(Point3::origin(), Vector3::y(), Vector2::zeros());
        assert_eq!(shader.vertex(&v, 3).0, Vector4::zeros());
    }

    #[test]
    fn tbn_records_follow_mesh_vertices() {
        let mesh = Mesh::create_plane(1.0);
        let records = TbnRecords::from_mesh(&mesh);
        assert_eq!(records.len(), mesh.vertices.len());
        for (v, n) in mesh.vertices.iter().zip(&records.normals) {
            assert_eq!(n.position(), v.position);
            assert_eq!(n.direction(), v.normal);
            assert_eq!(n.position[3], 1.0);
            assert_eq!(n.direction[3], 0.0);
        }
    }
}
