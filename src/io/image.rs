use crate::core::framebuffer::FrameBuffer;
use crate::error::{Error, Result};
use log::info;
use std::path::Path;

/// Resolves `framebuffer` to 8-bit sRGB and writes it; the format follows
/// the file extension.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    framebuffer
        .to_rgba8()
        .save(path)
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "Saved {}x{} image to {:?}",
        framebuffer.width, framebuffer.height, path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn writes_png_with_framebuffer_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut fb = FrameBuffer::new(5, 3, 2);
        fb.clear(Vector3::new(1.0, 0.0, 0.0));

        save_framebuffer(&fb, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(2, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn unwritable_path_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let fb = FrameBuffer::new(1, 1, 1);
        assert!(matches!(save_framebuffer(&fb, &path), Err(Error::Image { .. })));
    }
}
