use crate::scene::texture::Texture;
use nalgebra::Vector3;
use std::sync::Arc;

/// Per-surface appearance as the host stores it.
///
/// The two flags decide which branch the material resolver takes. A
/// texture may be attached while its flag is off (the GPU host always
/// binds a placeholder), and it is then ignored.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub ambient_color: Vector3<f32>,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub diffuse_texture: Option<Arc<Texture>>,
    pub normal_texture: Option<Arc<Texture>>,
    pub has_diffuse_texture: bool,
    pub has_normal_texture: bool,
}

impl Material {
    pub fn new(
        name: impl Into<String>,
        ambient_color: Vector3<f32>,
        diffuse_color: Vector3<f32>,
        specular_color: Vector3<f32>,
    ) -> Self {
        Self {
            name: name.into(),
            ambient_color,
            diffuse_color,
            specular_color,
            diffuse_texture: None,
            normal_texture: None,
            has_diffuse_texture: false,
            has_normal_texture: false,
        }
    }

    /// Untextured material with the given diffuse color.
    pub fn flat(name: impl Into<String>, diffuse_color: Vector3<f32>) -> Self {
        Self::new(
            name,
            Vector3::zeros(),
            diffuse_color,
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    /// Attaches a diffuse map and raises its flag.
    pub fn with_diffuse_texture(mut self, texture: Arc<Texture>) -> Self {
        self.diffuse_texture = Some(texture);
        self.has_diffuse_texture = true;
        self
    }

    /// Attaches a tangent-space normal map and raises its flag.
    pub fn with_normal_texture(mut self, texture: Arc<Texture>) -> Self {
        self.normal_texture = Some(texture);
        self.has_normal_texture = true;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        // Magenta marks surfaces that never received a material.
        Self::new(
            "default",
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }
}
