use crate::scene::material::Material;
use crate::scene::texture::Texture;
use crate::shading::config::NormalDecode;
use log::warn;
use nalgebra::{Vector2, Vector3};
use std::sync::Arc;

/// Tangent-space normal of a surface without a normal map.
pub const FLAT_NORMAL: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

#[derive(Debug, Clone)]
pub enum DiffuseSource {
    Flat(Vector3<f32>),
    Textured(Arc<Texture>),
}

#[derive(Debug, Clone)]
pub enum NormalSource {
    Flat,
    Textured(Arc<Texture>),
}

/// A material with its flags already turned into sources.
///
/// Built once per draw, so fragments branch on the stored variant rather
/// than re-reading the flags. Ambient and specular terms come from the light;
/// the material's own colors only reach the GPU through `MaterialUniform`.
#[derive(Debug, Clone)]
pub struct MaterialBinding {
    pub diffuse: DiffuseSource,
    pub normal: NormalSource,
}

impl MaterialBinding {
    /// A raised flag without its texture falls back to the flat source.
    pub fn resolve(material: &Material) -> Self {
        let diffuse = match (material.has_diffuse_texture, &material.diffuse_texture) {
            (true, Some(texture)) => DiffuseSource::Textured(Arc::clone(texture)),
            (true, None) => {
                warn!(
                    "material '{}' sets has_diffuse_texture without a texture; using flat color",
                    material.name
                );
                DiffuseSource::Flat(material.diffuse_color)
            }
            (false, _) => DiffuseSource::Flat(material.diffuse_color),
        };

        let normal = match (material.has_normal_texture, &material.normal_texture) {
            (true, Some(texture)) => NormalSource::Textured(Arc::clone(texture)),
            (true, None) => {
                warn!(
                    "material '{}' sets has_normal_texture without a texture; using flat normal",
                    material.name
                );
                NormalSource::Flat
            }
            (false, _) => NormalSource::Flat,
        };

        Self { diffuse, normal }
    }
}

#[inline]
pub fn resolve_diffuse(binding: &MaterialBinding, uv: Vector2<f32>) -> Vector3<f32> {
    match &binding.diffuse {
        DiffuseSource::Flat(color) => *color,
        DiffuseSource::Textured(texture) => texture.sample(uv),
    }
}

/// Returns the decoded sample, not yet normalized.
#[inline]
pub fn resolve_normal(
    binding: &MaterialBinding,
    uv: Vector2<f32>,
    decode: NormalDecode,
) -> Vector3<f32> {
    match &binding.normal {
        NormalSource::Flat => FLAT_NORMAL,
        NormalSource::Textured(texture) => decode.apply(texture.sample(uv)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uv() -> Vector2<f32> {
        Vector2::new(0.3, 0.7)
    }

    #[test]
    fn flat_color_wins_when_flag_is_off() {
        let mut material = Material::flat("red", Vector3::new(0.8, 0.2, 0.2));
        material.diffuse_texture = Some(Arc::new(Texture::solid(Vector3::new(0.0, 1.0, 0.0))));
        material.has_diffuse_texture = false;

        let binding = MaterialBinding::resolve(&material);
        assert_eq!(resolve_diffuse(&binding, uv()), Vector3::new(0.8, 0.2, 0.2));
    }

    #[test]
    fn texture_sample_used_when_flag_is_on() {
        let green = Vector3::new(0.0, 1.0, 0.0);
        let material = Material::flat("tex", Vector3::new(0.8, 0.2, 0.2))
            .with_diffuse_texture(Arc::new(Texture::solid(green)));
        let binding = MaterialBinding::resolve(&material);
        assert_eq!(resolve_diffuse(&binding, uv()), green);
    }

    #[test]
    fn missing_texture_downgrades_to_flat() {
        let mut material = Material::flat("broken", Vector3::new(0.1, 0.2, 0.3));
        material.has_diffuse_texture = true;
        material.has_normal_texture = true;
        let binding = MaterialBinding::resolve(&material);
        assert!(matches!(binding.diffuse, DiffuseSource::Flat(_)));
        assert!(matches!(binding.normal, NormalSource::Flat));
    }

    #[test]
    fn no_normal_map_gives_tangent_up() {
        let binding = MaterialBinding::resolve(&Material::default());
        for decode in [NormalDecode::Raw, NormalDecode::Remap] {
            assert_eq!(resolve_normal(&binding, uv(), decode), FLAT_NORMAL);
        }
    }

    #[test]
    fn neutral_normal_texel_remaps_to_flat_normal() {
        let material = Material::default()
            .with_normal_texture(Arc::new(Texture::solid(Vector3::new(0.5, 0.5, 1.0))));
        let binding = MaterialBinding::resolve(&material);
        assert_eq!(resolve_normal(&binding, uv(), NormalDecode::Remap), FLAT_NORMAL);
        assert_eq!(
            resolve_normal(&binding, uv(), NormalDecode::Raw),
            Vector3::new(0.5, 0.5, 1.0)
        );
    }
}
