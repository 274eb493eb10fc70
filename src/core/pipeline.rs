use crate::core::geometry::Vertex;
use nalgebra::{Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Values handed from the vertex stage to the fragment stage.
///
/// The rasterizer blends three of them as `a * wa + b * wb + c * wc`, so
/// unit vectors arrive denormalized and must be renormalized before use.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl Interpolatable for f32 {}
impl Interpolatable for Vector2<f32> {}
impl Interpolatable for Vector3<f32> {}
impl Interpolatable for Vector4<f32> {}

/// The programmable stages of one pipeline variant.
///
/// Both stages are pure functions of their arguments and of the read-only
/// state captured in `self`: invocations run in parallel, in no particular
/// order, and never communicate.
pub trait Shader: Send + Sync {
    type Varying: Interpolatable;

    /// Produces the homogeneous clip-space position and the varying for one
    /// vertex of one instance. Non-instanced draws pass `instance = 0`.
    fn vertex(&self, vertex: &Vertex, instance: u32) -> (Vector4<f32>, Self::Varying);

    /// Produces the linear RGBA color of one fragment. Alpha is always 1.
    fn fragment(&self, varying: Self::Varying) -> Vector4<f32>;
}
