use nalgebra::Vector3;
use serde::Deserialize;

/// Where the tangent-space change of basis is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TangentSpaceMode {
    /// Light, view and surface points are moved into tangent space per
    /// vertex and interpolated as points.
    PerVertexProjected,
    /// The interpolated world-space basis is renormalized per fragment and
    /// world-space directions are rotated into tangent space there.
    WorldSpace,
}

/// Whether the specular term is scaled by the diffuse term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecularPolicy {
    Plain,
    /// Suppresses highlights on surfaces facing away from the light.
    Masked,
}

/// How a normal-map texel becomes a tangent-space normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalDecode {
    /// Use the sample as is.
    Raw,
    /// `2 * sample - 1`.
    Remap,
}

impl NormalDecode {
    #[inline]
    pub fn apply(self, texel: Vector3<f32>) -> Vector3<f32> {
        match self {
            NormalDecode::Raw => texel,
            NormalDecode::Remap => texel * 2.0 - Vector3::repeat(1.0),
        }
    }
}

/// One point in the space of lit pipeline variants.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tangent_space: TangentSpaceMode,
    pub specular: SpecularPolicy,
    pub normal_decode: NormalDecode,
    pub specular_exponent: f32,
}

impl PipelineConfig {
    /// Tangent space computed per vertex, plain specular, raw normal samples.
    pub const fn vertex_projected() -> Self {
        Self {
            tangent_space: TangentSpaceMode::PerVertexProjected,
            specular: SpecularPolicy::Plain,
            normal_decode: NormalDecode::Raw,
            specular_exponent: 32.0,
        }
    }

    /// World-space TBN per fragment, masked specular, remapped normal samples.
    pub const fn fragment_tbn() -> Self {
        Self {
            tangent_space: TangentSpaceMode::WorldSpace,
            specular: SpecularPolicy::Masked,
            normal_decode: NormalDecode::Remap,
            specular_exponent: 64.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::fragment_tbn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fragment_tbn() {
        assert_eq!(PipelineConfig::default(), PipelineConfig::fragment_tbn());
    }

    #[test]
    fn remap_takes_unit_interval_to_signed() {
        let flat = NormalDecode::Remap.apply(Vector3::new(0.5, 0.5, 1.0));
        assert_eq!(flat, Vector3::new(0.0, 0.0, 1.0));
        let raw = NormalDecode::Raw.apply(Vector3::new(0.5, 0.5, 1.0));
        assert_eq!(raw, Vector3::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() {
        let cfg: PipelineConfig = toml::from_str(
            r#"
            tangent_space = "per_vertex_projected"
            specular_exponent = 128.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tangent_space, TangentSpaceMode::PerVertexProjected);
        assert_eq!(cfg.specular, SpecularPolicy::Masked);
        assert_eq!(cfg.normal_decode, NormalDecode::Remap);
        assert_eq!(cfg.specular_exponent, 128.0);
    }
}
