use crate::core::color::opaque;
use crate::core::geometry::{Vertex, transform_position};
use crate::core::pipeline::{Interpolatable, Shader};
use crate::scene::camera::CameraState;
use crate::scene::texture::Texture;
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};
use std::sync::Arc;

/// What an unlit draw writes. None of these touch the light.
#[derive(Debug, Clone)]
pub enum UnlitMode {
    /// Color passthrough. `Vertex` carries no color attribute, so the vertex
    /// stage emits this color for every vertex and the interpolated varying
    /// is passed through unchanged. Used for the light marker and glyphs.
    FlatColor(Vector3<f32>),
    /// Straight texture lookup at the interpolated UV.
    Textured(Arc<Texture>),
    /// Solid black, for wireframe overlays and placeholders.
    Black,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnlitVarying {
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl Add for UnlitVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            color: self.color + other.color,
            uv: self.uv + other.uv,
        }
    }
}

impl Mul<f32> for UnlitVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            color: self.color * scalar,
            uv: self.uv * scalar,
        }
    }
}

impl Interpolatable for UnlitVarying {}

pub struct UnlitShader {
    pub camera: CameraState,
    pub model: Matrix4<f32>,
    pub mode: UnlitMode,
}

impl UnlitShader {
    pub fn new(camera: CameraState, model: Matrix4<f32>, mode: UnlitMode) -> Self {
        Self {
            camera,
            model,
            mode,
        }
    }
}

impl Shader for UnlitShader {
    type Varying = UnlitVarying;

    fn vertex(&self, vertex: &Vertex, _instance: u32) -> (Vector4<f32>, Self::Varying) {
        let (clip, _) =
            transform_position(&vertex.position, &self.model, &self.camera.view_projection);
        let color = match &self.mode {
            UnlitMode::FlatColor(c) => *c,
            UnlitMode::Textured(_) | UnlitMode::Black => Vector3::zeros(),
        };
        (
            clip,
            UnlitVarying {
                color,
                uv: vertex.texcoord,
            },
        )
    }

    fn fragment(&self, varying: Self::Varying) -> Vector4<f32> {
        match &self.mode {
            UnlitMode::FlatColor(_) => opaque(varying.color),
            UnlitMode::Textured(texture) => opaque(texture.sample(varying.uv)),
            UnlitMode::Black => opaque(Vector3::zeros()),
        }
    }
}
