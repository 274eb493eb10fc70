use crate::core::rasterizer::CullMode;
use crate::error::{Error, Result};
use crate::pipeline::shaders::debug_vector::GLYPH_SCALE;
use crate::scene::texture::Sampler;
use crate::shading::config::PipelineConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One frame: a single object under a single point light.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub object: ObjectConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Supersampling factor per axis.
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 3],
    #[serde(default)]
    pub cull_mode: CullMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            samples: default_samples(),
            output: default_output(),
            clear_color: default_clear_color(),
            cull_mode: CullMode::default(),
        }
    }
}

impl RenderConfig {
    /// Rejects target sizes the framebuffer cannot hold.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("samples", self.samples),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("render.{} must be at least 1", name)));
            }
        }
        Ok(())
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_samples() -> usize {
    1
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_clear_color() -> [f32; 3] {
    [0.1, 0.2, 0.3]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default)]
    pub projection: ProjectionKind,
    #[serde(default = "default_ortho_height")]
    pub ortho_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            projection: ProjectionKind::default(),
            ortho_height: default_ortho_height(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 2.0, 5.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_ortho_height() -> f32 {
    5.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_position")]
    pub position: [f32; 3],
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_white")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_white")]
    pub specular: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: default_light_position(),
            ambient: default_ambient(),
            diffuse: default_white(),
            specular: default_white(),
        }
    }
}

fn default_light_position() -> [f32; 3] {
    [2.0, 3.0, 2.0]
}
fn default_ambient() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}
fn default_white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialConfig {
    #[serde(default)]
    pub ambient: [f32; 3],
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_white")]
    pub specular: [f32; 3],
    /// sRGB image; enables the textured diffuse branch.
    #[serde(default)]
    pub diffuse_texture: Option<String>,
    /// Linear tangent-space normal map; enables the textured normal branch.
    #[serde(default)]
    pub normal_texture: Option<String>,
    #[serde(default)]
    pub sampler: Sampler,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0],
            diffuse: default_diffuse(),
            specular: default_white(),
            diffuse_texture: None,
            normal_texture: None,
            sampler: Sampler::default(),
        }
    }
}

fn default_diffuse() -> [f32; 3] {
    [0.8, 0.2, 0.2]
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectConfig {
    /// One of `triangle`, `plane`, `sphere`, `octahedron`, `arrow`.
    #[serde(default = "default_mesh")]
    pub mesh: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees, applied X then Y then Z.
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Uniform only; normals are transformed by the model matrix as is.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            mesh: default_mesh(),
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: default_scale(),
        }
    }
}

fn default_mesh() -> String {
    "sphere".to_string()
}
fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct DebugConfig {
    /// Flat-colored octahedron at the light position.
    #[serde(default = "default_true")]
    pub light_marker: bool,
    #[serde(default = "default_marker_scale")]
    pub light_marker_scale: f32,
    /// Black wireframe overlay on the object.
    #[serde(default)]
    pub geometry: bool,
    /// Tangent, bitangent and normal glyphs at every vertex.
    #[serde(default)]
    pub vectors: bool,
    #[serde(default = "default_glyph_scale")]
    pub glyph_scale: f32,
    #[serde(default = "default_wireframe_depth_bias")]
    pub wireframe_depth_bias: f32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            light_marker: true,
            light_marker_scale: default_marker_scale(),
            geometry: false,
            vectors: false,
            glyph_scale: default_glyph_scale(),
            wireframe_depth_bias: default_wireframe_depth_bias(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_marker_scale() -> f32 {
    0.1
}
fn default_glyph_scale() -> f32 {
    GLYPH_SCALE
}
fn default_wireframe_depth_bias() -> f32 {
    1e-4
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.render.validate()
    }
}
