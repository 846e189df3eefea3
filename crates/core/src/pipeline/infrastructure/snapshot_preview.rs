use std::path::{Path, PathBuf};

use crate::pipeline::frame_preview::FramePreview;
use crate::shared::constants::PREVIEW_FILE_NAME;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Longest edge of the preview image.
const PREVIEW_MAX_EDGE: u32 = 960;

/// Headless stand-in for a live window: keeps `<output_dir>/preview.jpg`
/// updated with the latest annotated frame.
///
/// A snapshot is written on the first frame and then every `interval`
/// frames; the last frame shown is always written on close.
pub struct SnapshotPreview {
    writer: Box<dyn ImageWriter>,
    path: PathBuf,
    interval: usize,
    shown: usize,
    written: usize,
    last: Option<Frame>,
}

impl SnapshotPreview {
    pub fn new(writer: Box<dyn ImageWriter>, output_dir: &Path, interval: usize) -> Self {
        Self {
            writer,
            path: output_dir.join(PREVIEW_FILE_NAME),
            interval: interval.max(1),
            shown: 0,
            written: 0,
            last: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of snapshots written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn write(&mut self, frame: &Frame) {
        match self
            .writer
            .write(&self.path, frame, preview_size(frame.width(), frame.height()))
        {
            Ok(()) => self.written += 1,
            Err(e) => log::warn!("Could not update preview {}: {e}", self.path.display()),
        }
    }
}

impl FramePreview for SnapshotPreview {
    fn show(&mut self, frame: &Frame) {
        let due = self.shown % self.interval == 0;
        self.shown += 1;
        if due {
            self.write(frame);
            self.last = None;
        } else {
            self.last = Some(frame.clone());
        }
    }

    fn close(&mut self) {
        if let Some(frame) = self.last.take() {
            self.write(&frame);
        }
    }
}

/// Downscales large frames so the longest edge is at most `PREVIEW_MAX_EDGE`.
fn preview_size(width: u32, height: u32) -> Option<(u32, u32)> {
    let longest = width.max(height);
    if longest <= PREVIEW_MAX_EDGE {
        return None;
    }
    let scale = PREVIEW_MAX_EDGE as f64 / longest as f64;
    Some((
        ((width as f64 * scale).round() as u32).max(1),
        ((height as f64 * scale).round() as u32).max(1),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    #[allow(clippy::type_complexity)]
    struct RecordingImageWriter {
        writes: Arc<Mutex<Vec<(PathBuf, usize, Option<(u32, u32)>)>>>,
        fail: bool,
    }

    impl ImageWriter for RecordingImageWriter {
        fn write(
            &self,
            path: &Path,
            frame: &Frame,
            size: Option<(u32, u32)>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail {
                return Err("disk full".into());
            }
            self.writes
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.index(), size));
            Ok(())
        }
    }

    #[allow(clippy::type_complexity)]
    fn preview(interval: usize, fail: bool) -> (SnapshotPreview, Arc<Mutex<Vec<(PathBuf, usize, Option<(u32, u32)>)>>>) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let writer = RecordingImageWriter {
            writes: writes.clone(),
            fail,
        };
        (
            SnapshotPreview::new(Box::new(writer), Path::new("output"), interval),
            writes,
        )
    }

    #[test]
    fn test_writes_first_frame_then_every_interval() {
        let (mut preview, writes) = preview(3, false);
        for i in 0..7 {
            preview.show(&Frame::filled(8, 8, [0, 0, 0], i));
        }

        let indices: Vec<usize> = writes.lock().unwrap().iter().map(|w| w.1).collect();
        assert_eq!(indices, vec![0, 3, 6]);
        assert_eq!(writes.lock().unwrap()[0].0, PathBuf::from("output/preview.jpg"));
    }

    #[test]
    fn test_close_flushes_latest_frame() {
        let (mut preview, writes) = preview(10, false);
        for i in 0..4 {
            preview.show(&Frame::filled(8, 8, [0, 0, 0], i));
        }
        preview.close();

        let indices: Vec<usize> = writes.lock().unwrap().iter().map(|w| w.1).collect();
        assert_eq!(indices, vec![0, 3]);
        assert_eq!(preview.written(), 2);
    }

    #[test]
    fn test_close_without_pending_frame_writes_nothing() {
        let (mut preview, writes) = preview(1, false);
        preview.show(&Frame::filled(8, 8, [0, 0, 0], 0));
        preview.close();
        assert_eq!(writes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let (mut preview, _) = preview(1, true);
        preview.show(&Frame::filled(8, 8, [0, 0, 0], 0));
        preview.close();
        assert_eq!(preview.written(), 0);
    }

    #[test]
    fn test_snapshot_on_disk() {
        use crate::video::infrastructure::image_file_writer::ImageFileWriter;

        let dir = tempfile::tempdir().unwrap();
        let mut preview = SnapshotPreview::new(Box::new(ImageFileWriter::new()), dir.path(), 1);
        preview.show(&Frame::filled(64, 48, [0, 255, 0], 0));

        let img = image::open(dir.path().join(PREVIEW_FILE_NAME)).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[rstest]
    #[case(640, 480, None)]
    #[case(960, 540, None)]
    #[case(1920, 1080, Some((960, 540)))]
    #[case(1080, 1920, Some((540, 960)))]
    fn test_preview_size(#[case] w: u32, #[case] h: u32, #[case] expected: Option<(u32, u32)>) {
        assert_eq!(preview_size(w, h), expected);
    }
}
