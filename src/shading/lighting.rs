//! Ambient, Lambertian diffuse and Blinn-Phong specular from one point light.

use crate::core::math::normalize_or;
use crate::scene::light::PointLight;
use crate::shading::config::{PipelineConfig, SpecularPolicy};
use crate::shading::material::FLAT_NORMAL;
use crate::shading::tangent_space::{TangentSpacePoints, Tbn};
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParams {
    pub specular_exponent: f32,
    pub specular_policy: SpecularPolicy,
}

impl From<&PipelineConfig> for LightingParams {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            specular_exponent: config.specular_exponent,
            specular_policy: config.specular,
        }
    }
}

/// Unit light and view directions in tangent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Directions {
    pub light: Vector3<f32>,
    pub view: Vector3<f32>,
}

/// Result of one evaluation. Both strengths lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shade {
    pub diffuse_strength: f32,
    pub specular_strength: f32,
    pub color: Vector3<f32>,
}

/// Directions from points that were already moved into tangent space.
pub fn tangent_space_directions(points: &TangentSpacePoints) -> Directions {
    Directions {
        light: normalize_or(points.light - points.fragment, Vector3::z()),
        view: normalize_or(points.view - points.fragment, Vector3::z()),
    }
}

/// Directions from world-space points, rotated into tangent space by `tbn`.
pub fn world_space_directions(
    tbn: &Tbn,
    light: &Point3<f32>,
    view: &Point3<f32>,
    fragment: &Point3<f32>,
) -> Directions {
    Directions {
        light: normalize_or(tbn.to_tangent(&(light - fragment)), Vector3::z()),
        view: normalize_or(tbn.to_tangent(&(view - fragment)), Vector3::z()),
    }
}

/// Shades one surface sample. `normal` is in tangent space and need not be
/// unit length; `base_color` is the resolved diffuse color.
pub fn evaluate(
    normal: &Vector3<f32>,
    directions: &Directions,
    light: &PointLight,
    base_color: &Vector3<f32>,
    params: &LightingParams,
) -> Shade {
    let n = normalize_or(*normal, FLAT_NORMAL);
    let half = normalize_or(directions.light + directions.view, Vector3::zeros());

    let diffuse_strength = n.dot(&directions.light).clamp(0.0, 1.0);
    let mut specular_strength = n
        .dot(&half)
        .clamp(0.0, 1.0)
        .powf(params.specular_exponent);
    if params.specular_policy == SpecularPolicy::Masked {
        specular_strength *= diffuse_strength;
    }

    let lit = light.ambient_color
        + light.diffuse_color * diffuse_strength
        + light.specular_color * specular_strength;

    Shade {
        diffuse_strength,
        specular_strength,
        color: lit.component_mul(base_color),
    }
}
