//! Byte layouts shared with the GPU host.
//!
//! Each struct matches its shader-side declaration field for field,
//! including the explicit padding that uniform buffers need after every
//! `vec3`. The `const` assertions pin the sizes; the tests pin the offsets.

use crate::core::geometry::Vertex;
use crate::scene::camera::CameraState;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};
use std::mem::{offset_of, size_of};

/// Slot "frame", binding 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_projection: [[f32; 4]; 4],
}

/// Slot "frame", binding 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub _padding0: u32,
    pub ambient_color: [f32; 3],
    pub _padding1: u32,
    pub diffuse_color: [f32; 3],
    pub _padding2: u32,
    pub specular_color: [f32; 3],
    pub _padding3: u32,
}

/// Slot "frame", binding 2. Uploaded every frame, read by no current stage.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TimeUniform {
    pub millis: u32,
}

/// Slot "material", binding 4 (after the two texture/sampler pairs).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ambient_color: [f32; 3],
    pub _padding0: u32,
    pub diffuse_color: [f32; 3],
    pub _padding1: u32,
    pub specular_color: [f32; 3],
    pub _padding2: u32,
    // u32 rather than bool: WGSL has no host-shareable bool.
    pub has_diffuse_texture: u32,
    pub has_normal_texture: u32,
    pub _padding3: [u32; 2],
}

/// Slot "object", binding 0: the model matrix as four columns.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelTransformUniform {
    pub columns: [[f32; 4]; 4],
}

/// Slot "object", binding 1 of the debug pipeline: one glyph instance.
///
/// Only `xyz` of each field is read. `direction` must be non-zero but need
/// not be normalized.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DebugVectorRecord {
    pub position: [f32; 4],
    pub direction: [f32; 4],
}

/// Interleaved vertex buffer element.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

const _: () = assert!(size_of::<CameraUniform>() == 80);
const _: () = assert!(size_of::<LightUniform>() == 64);
const _: () = assert!(size_of::<TimeUniform>() == 4);
const _: () = assert!(size_of::<MaterialUniform>() == 64);
const _: () = assert!(size_of::<MaterialUniform>() % 16 == 0);
const _: () = assert!(size_of::<ModelTransformUniform>() == 64);
const _: () = assert!(size_of::<DebugVectorRecord>() == 32);
const _: () = assert!(size_of::<ModelVertex>() == 56);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
}

impl VertexFormat {
    pub const fn size(self) -> usize {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub offset: usize,
    pub format: VertexFormat,
}

impl ModelVertex {
    pub const STRIDE: usize = size_of::<ModelVertex>();

    /// Shader locations 0..=4. Pipelines without a tangent frame bind the
    /// first three only.
    pub const ATTRIBUTES: [VertexAttribute; 5] = [
        VertexAttribute {
            location: 0,
            offset: offset_of!(ModelVertex, position),
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            location: 1,
            offset: offset_of!(ModelVertex, tex_coords),
            format: VertexFormat::Float32x2,
        },
        VertexAttribute {
            location: 2,
            offset: offset_of!(ModelVertex, normal),
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            location: 3,
            offset: offset_of!(ModelVertex, tangent),
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            location: 4,
            offset: offset_of!(ModelVertex, bitangent),
            format: VertexFormat::Float32x3,
        },
    ];
}

impl From<&Vertex> for ModelVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            position: v.position.coords.into(),
            tex_coords: v.texcoord.into(),
            normal: v.normal.into(),
            tangent: v.tangent.into(),
            bitangent: v.bitangent.into(),
        }
    }
}

impl From<&ModelVertex> for Vertex {
    fn from(v: &ModelVertex) -> Self {
        Vertex {
            position: Point3::from(v.position),
            texcoord: Vector2::from(v.tex_coords),
            normal: Vector3::from(v.normal),
            tangent: Vector3::from(v.tangent),
            bitangent: Vector3::from(v.bitangent),
        }
    }
}

impl From<&CameraState> for CameraUniform {
    fn from(camera: &CameraState) -> Self {
        Self {
            view_position: camera.view_position.to_homogeneous().into(),
            view_projection: camera.view_projection.into(),
        }
    }
}

impl From<&PointLight> for LightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.coords.into(),
            _padding0: 0,
            ambient_color: light.ambient_color.into(),
            _padding1: 0,
            diffuse_color: light.diffuse_color.into(),
            _padding2: 0,
            specular_color: light.specular_color.into(),
            _padding3: 0,
        }
    }
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            ambient_color: material.ambient_color.into(),
            _padding0: 0,
            diffuse_color: material.diffuse_color.into(),
            _padding1: 0,
            specular_color: material.specular_color.into(),
            _padding2: 0,
            has_diffuse_texture: u32::from(material.has_diffuse_texture),
            has_normal_texture: u32::from(material.has_normal_texture),
            _padding3: [0; 2],
        }
    }
}

impl From<&Matrix4<f32>> for ModelTransformUniform {
    fn from(m: &Matrix4<f32>) -> Self {
        Self {
            columns: (*m).into(),
        }
    }
}

impl ModelTransformUniform {
    pub fn identity() -> Self {
        Self::from(&Matrix4::identity())
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.columns)
    }
}

impl DebugVectorRecord {
    pub fn new(position: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            position: position.to_homogeneous().into(),
            direction: direction.to_homogeneous().into(),
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from(Vector4::from(self.position).xyz())
    }

    pub fn direction(&self) -> Vector3<f32> {
        Vector4::from(self.direction).xyz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::TransformFactory;

    #[test]
    fn uniform_offsets_follow_vec3_padding() {
        assert_eq!(offset_of!(LightUniform, position), 0);
        assert_eq!(offset_of!(LightUniform, ambient_color), 16);
        assert_eq!(offset_of!(LightUniform, diffuse_color), 32);
        assert_eq!(offset_of!(LightUniform, specular_color), 48);

        assert_eq!(offset_of!(MaterialUniform, ambient_color), 0);
        assert_eq!(offset_of!(MaterialUniform, diffuse_color), 16);
        assert_eq!(offset_of!(MaterialUniform, specular_color), 32);
        assert_eq!(offset_of!(MaterialUniform, has_diffuse_texture), 48);
        assert_eq!(offset_of!(MaterialUniform, has_normal_texture), 52);

        assert_eq!(offset_of!(CameraUniform, view_position), 0);
        assert_eq!(offset_of!(CameraUniform, view_projection), 16);

        assert_eq!(offset_of!(DebugVectorRecord, position), 0);
        assert_eq!(offset_of!(DebugVectorRecord, direction), 16);
    }

    #[test]
    fn vertex_attributes_are_contiguous() {
        let mut expected_offset = 0;
        for (i, attr) in ModelVertex::ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.location, i as u32);
            assert_eq!(attr.offset, expected_offset);
            expected_offset += attr.format.size();
        }
        assert_eq!(expected_offset, ModelVertex::STRIDE);
    }

    #[test]
    fn model_transform_is_stored_column_major() {
        let m = TransformFactory::translation(&Vector3::new(1.0, 2.0, 3.0));
        let uniform = ModelTransformUniform::from(&m);
        assert_eq!(uniform.columns[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.matrix(), m);
    }

    #[test]
    fn material_flags_pack_as_u32() {
        let material = Material::flat("red", Vector3::new(1.0, 0.0, 0.0));
        let uniform = MaterialUniform::from(&material);
        assert_eq!(uniform.has_diffuse_texture, 0);
        assert_eq!(uniform.has_normal_texture, 0);
        let bytes = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[16..20], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn debug_record_buffer_is_tightly_packed() {
        let records = [
            DebugVectorRecord::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 2.0, 0.0)),
            DebugVectorRecord::new(Point3::origin(), Vector3::x()),
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&records);
        assert_eq!(bytes.len(), 64);
        assert_eq!(records[0].position(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(records[0].direction(), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(records[0].direction[3], 0.0);
    }

    #[test]
    fn vertex_round_trips_through_buffer_layout() {
        let v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::z(), Vector2::new(0.5, 0.25))
            .with_tangent_frame(Vector3::x(), Vector3::y());
        assert_eq!(Vertex::from(&ModelVertex::from(&v)), v);
    }
}
