//! Saving frames to disk.

use color_eyre::eyre::{ContextCompat as _, Result, WrapErr as _};
use rects_core::Canvas;

/// Save the canvas as a PNG, un-premultiplying its pixels on the way.
pub fn save_png(canvas: &Canvas, path: &std::path::Path) -> Result<()> {
    if let Some(directory) = path.parent() {
        if !directory.as_os_str().is_empty() {
            std::fs::create_dir_all(directory)?;
        }
    }

    let pixels = canvas.to_straight_rgba();
    let image = image::RgbaImage::from_raw(canvas.width(), canvas.height(), pixels)
        .context("Canvas pixels don't match its size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .wrap_err_with(|| format!("Couldn't save frame to {}", path.display()))?;

    tracing::debug!("Saved frame to {path:?}");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn saved_frames_are_straight_alpha() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("nested").join("frame.png");

        let mut canvas = Canvas::new(2, 1);
        canvas.fill([64, 0, 0, 128]);
        save_png(&canvas, &path).unwrap();

        let image = image::open(&path).unwrap().into_rgba8();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(1, 0).0, [128, 0, 0, 128]);
    }
}
