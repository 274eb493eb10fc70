use nalgebra::{Point3, Vector3};

/// The single point light of a frame. Colors are non-negative linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World space.
    pub position: Point3<f32>,
    pub ambient_color: Vector3<f32>,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
}

impl PointLight {
    pub fn new(
        position: Point3<f32>,
        ambient_color: Vector3<f32>,
        diffuse_color: Vector3<f32>,
        specular_color: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            ambient_color,
            diffuse_color,
            specular_color,
        }
    }

    /// Same color for all three terms.
    pub fn white(position: Point3<f32>) -> Self {
        let white = Vector3::new(1.0, 1.0, 1.0);
        Self::new(position, white, white, white)
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Point3::new(15.0, 15.0, 15.0),
            ambient_color: Vector3::new(0.01, 0.01, 0.01),
            diffuse_color: Vector3::new(0.5, 0.5, 0.5),
            specular_color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}
