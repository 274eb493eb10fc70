use crate::core::color::srgb_to_linear;
use crate::error::{Error, Result};
use image::Rgb32FImage;
use log::info;
use nalgebra::{Vector2, Vector3};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    #[default]
    Repeat,
    ClampToEdge,
}

/// Filtering and wrap configuration paired with a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Sampler {
    #[serde(default)]
    pub filter: FilterMode,
    #[serde(default)]
    pub address: AddressMode,
}

/// How stored texel values relate to linear light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Color images; decoded to linear when the texture is created.
    Srgb,
    /// Data images such as normal maps; used as stored.
    Linear,
}

/// A decoded image plus its sampler. Texels are linear RGB, row 0 at the top.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub sampler: Sampler,
    texels: Arc<Vec<Vector3<f32>>>,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(
        path: P,
        color_space: ColorSpace,
        sampler: Sampler,
    ) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| Error::Image {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let texture = Self::from_rgb32f(&img.to_rgb32f(), color_space, sampler);
        info!(
            "Loaded texture: {:?} ({}x{}, {:?})",
            path_ref, texture.width, texture.height, color_space
        );
        Ok(texture)
    }

    pub fn from_rgb32f(img: &Rgb32FImage, color_space: ColorSpace, sampler: Sampler) -> Self {
        let texels = img
            .pixels()
            .map(|p| {
                let raw = Vector3::new(p[0], p[1], p[2]);
                match color_space {
                    ColorSpace::Srgb => srgb_to_linear(raw),
                    ColorSpace::Linear => raw,
                }
            })
            .collect();
        Self::from_texels(img.width(), img.height(), texels, sampler)
    }

    /// `texels` are linear, row-major, `width * height` long.
    pub fn from_texels(
        width: u32,
        height: u32,
        texels: Vec<Vector3<f32>>,
        sampler: Sampler,
    ) -> Self {
        debug_assert_eq!(texels.len(), (width * height) as usize);
        Self {
            width,
            height,
            sampler,
            texels: Arc::new(texels),
        }
    }

    /// A 1x1 texture of the given linear color. Samples return `color` exactly.
    pub fn solid(color: Vector3<f32>) -> Self {
        let sampler = Sampler {
            filter: FilterMode::Nearest,
            address: AddressMode::Repeat,
        };
        Self::from_texels(1, 1, vec![color], sampler)
    }

    /// Looks up the texture at `uv` using its sampler. `v = 0` is the bottom row.
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let x = uv.x * self.width as f32;
        let y = (1.0 - uv.y) * self.height as f32;

        match self.sampler.filter {
            FilterMode::Nearest => self.texel(x.floor() as i32, y.floor() as i32),
            FilterMode::Linear => {
                // Texel centers sit at half-integer coordinates.
                let x = x - 0.5;
                let y = y - 0.5;
                // Huge UVs saturate the cast, so the neighbour must not overflow.
                let (x0, y0) = (x.floor() as i32, y.floor() as i32);
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));
                let wx = x - x.floor();
                let wy = y - y.floor();

                let top = self.texel(x0, y0) * (1.0 - wx) + self.texel(x1, y0) * wx;
                let bottom = self.texel(x0, y1) * (1.0 - wx) + self.texel(x1, y1) * wx;
                top * (1.0 - wy) + bottom * wy
            }
        }
    }

    fn texel(&self, x: i32, y: i32) -> Vector3<f32> {
        let w = self.width as i32;
        let h = self.height as i32;
        let (x, y) = match self.sampler.address {
            AddressMode::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
            AddressMode::ClampToEdge => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
        };
        self.texels[(y * w + x) as usize]
    }
}
