use nalgebra::{Vector3, Vector4};

const GAMMA: f32 = 2.2;

/// Every pipeline variant writes a single RGBA target with alpha fixed at 1.
#[inline]
pub fn opaque(rgb: Vector3<f32>) -> Vector4<f32> {
    Vector4::new(rgb.x, rgb.y, rgb.z, 1.0)
}

/// Linear RGB to display sRGB (gamma approximation).
pub fn linear_to_srgb(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| c.max(0.0).powf(1.0 / GAMMA))
}

/// Display sRGB to linear RGB, the inverse of [`linear_to_srgb`].
pub fn srgb_to_linear(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| c.max(0.0).powf(GAMMA))
}

/// Quantizes an encoded [0, 1] channel to 8 bits.
#[inline]
pub fn to_unorm8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
