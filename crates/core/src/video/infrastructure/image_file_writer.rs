use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes a single frame to an image file using the `image` crate.
///
/// The format follows the file extension. The image is written to a sibling
/// temp file first and renamed, so a viewer polling the path never sees a
/// half-written snapshot.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let img = match size {
            Some((w, h)) => image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle),
            None => img,
        };

        let format = image::ImageFormat::from_path(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("Image path has no file name")?;
        let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

        img.save_with_format(&temp_path, format)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_file_and_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preview.png");
        let frame = Frame::filled(100, 80, [50, 100, 200], 0);

        ImageFileWriter::new().write(&path, &frame, None).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (100, 80));
        assert_eq!(img.get_pixel(10, 10).0, [50, 100, 200]);
    }

    #[test]
    fn test_write_with_resize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        let frame = Frame::filled(100, 80, [0, 255, 0], 0);

        ImageFileWriter::new()
            .write(&path, &frame, Some((50, 40)))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (50, 40));
    }

    #[test]
    fn test_write_jpeg_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.jpg");
        let frame = Frame::filled(32, 32, [200, 10, 10], 0);

        ImageFileWriter::new().write(&path, &frame, None).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("preview.jpg")]);
    }

    #[test]
    fn test_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.xyz");
        let frame = Frame::filled(4, 4, [0, 0, 0], 0);
        assert!(ImageFileWriter::new().write(&path, &frame, None).is_err());
    }
}
