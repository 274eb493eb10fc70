use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::Matrix4;

/// A mesh placed in the world with its own material.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub material: Material,
    /// Must not contain non-uniform scale or shear.
    pub transform: Matrix4<f32>,
}

impl SceneObject {
    pub fn new(mesh: Mesh, material: Material, transform: Matrix4<f32>) -> Self {
        Self {
            mesh,
            material,
            transform,
        }
    }
}
