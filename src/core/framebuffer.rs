use crate::core::color::{linear_to_srgb, to_unorm8};
use image::RgbaImage;
use nalgebra::{Vector3, Vector4};
use rayon::prelude::*;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

const LOCK_STRIPES: usize = 1024;

/// RGBA color target plus depth, shared by all fragment invocations of a draw.
///
/// Depth is tested with a CAS loop on the f32 bits; color writes are guarded
/// by a pool of striped locks so rows can be shaded in parallel.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// Supersampling factor per axis.
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,

    color_buffer: UnsafeCell<Vec<Vector4<f32>>>,
    depth_buffer: Vec<AtomicU32>,
    locks: Vec<Mutex<()>>,
}

// Color access goes through `locks`, depth through atomics.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        let inf_bits = f32::INFINITY.to_bits();
        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color_buffer: UnsafeCell::new(vec![Vector4::new(0.0, 0.0, 0.0, 1.0); size]),
            depth_buffer: (0..size).map(|_| AtomicU32::new(inf_bits)).collect(),
            locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Resets every sample to `color` (alpha 1) and depth to infinity.
    pub fn clear(&mut self, color: Vector3<f32>) {
        let fill = Vector4::new(color.x, color.y, color.z, 1.0);
        self.color_buffer.get_mut().fill(fill);
        let inf_bits = f32::INFINITY.to_bits();
        for depth in &self.depth_buffer {
            depth.store(inf_bits, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.buffer_width && y < self.buffer_height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Atomically replaces the stored depth when `new_depth` is closer.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let depth_atomic = &self.depth_buffer[self.index(x, y)];
        let new_bits = new_depth.to_bits();

        let mut current_bits = depth_atomic.load(Ordering::Relaxed);
        loop {
            if new_depth >= f32::from_bits(current_bits) {
                return false;
            }
            match depth_atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated_bits) => current_bits = updated_bits,
            }
        }
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(f32::from_bits(
            self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed),
        ))
    }

    /// Writes one sample. Call only after `depth_test_and_update` succeeded.
    #[inline]
    pub fn set_pixel_safe(&self, x: usize, y: usize, color: Vector4<f32>) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let _guard = self.locks[idx % self.locks.len()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // SAFETY: the stripe lock for `idx` is held for the duration of the write.
        unsafe {
            let buffer = &mut *self.color_buffer.get();
            buffer[idx] = color;
        }
    }

    /// Resolved (sample-averaged) color of output pixel `(x, y)`.
    ///
    /// Intended for use once shading has finished.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector4<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        // SAFETY: read-only access after the draw calls have returned.
        let buffer = unsafe { &*self.color_buffer.get() };

        if self.sample_count == 1 {
            return Some(buffer[self.index(x, y)]);
        }

        let start_x = x * self.sample_count;
        let start_y = y * self.sample_count;
        let mut sum = Vector4::zeros();
        for dy in 0..self.sample_count {
            for dx in 0..self.sample_count {
                sum += buffer[self.index(start_x + dx, start_y + dy)];
            }
        }
        Some(sum / (self.sample_count * self.sample_count) as f32)
    }

    /// Encodes the resolved target as 8-bit sRGB with alpha preserved.
    pub fn to_rgba8(&self) -> RgbaImage {
        if self.width == 0 || self.height == 0 {
            return RgbaImage::new(self.width as u32, self.height as u32);
        }
        let mut bytes = vec![0u8; self.width * self.height * 4];
        bytes
            .par_chunks_mut(self.width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    if let Some(color) = self.get_pixel(x, y) {
                        let srgb = linear_to_srgb(color.xyz());
                        pixel[0] = to_unorm8(srgb.x);
                        pixel[1] = to_unorm8(srgb.y);
                        pixel[2] = to_unorm8(srgb.z);
                        pixel[3] = to_unorm8(color.w);
                    }
                }
            });
        // Length always matches width * height * 4.
        RgbaImage::from_raw(self.width as u32, self.height as u32, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closer_depth_wins() {
        let fb = FrameBuffer::new(2, 2, 1);
        assert!(fb.depth_test_and_update(0, 0, 0.5));
        assert!(!fb.depth_test_and_update(0, 0, 0.7));
        assert!(fb.depth_test_and_update(0, 0, 0.2));
        assert_eq!(fb.depth_at(0, 0), Some(0.2));
    }

    #[test]
    fn supersampled_pixels_are_averaged() {
        let fb = FrameBuffer::new(1, 1, 2);
        fb.set_pixel_safe(0, 0, Vector4::new(1.0, 1.0, 1.0, 1.0));
        let color = fb.get_pixel(0, 0).unwrap();
        assert!((color.x - 0.25).abs() < 1e-6);
        assert!((color.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(1, 1, 1);
        fb.depth_test_and_update(0, 0, 0.1);
        fb.clear(Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(fb.depth_at(0, 0), Some(f32::INFINITY));
        assert_eq!(fb.get_pixel(0, 0), Some(Vector4::new(0.1, 0.2, 0.3, 1.0)));
    }

    #[test]
    fn export_keeps_alpha_opaque() {
        let fb = FrameBuffer::new(3, 2, 1);
        let img = fb.to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert!(img.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn empty_target_exports_empty_image() {
        let fb = FrameBuffer::new(0, 4, 1);
        assert_eq!(fb.to_rgba8().dimensions(), (0, 4));
    }
}
