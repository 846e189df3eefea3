use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Source of the frames to annotate.
///
/// Frames come out as RGB24 in decode order with indices starting at 0.
/// End of stream is the iterator running dry; a decode failure is an
/// `Err` item and the caller decides whether to stop.
pub trait VideoReader: Send {
    /// Opens the source and reports geometry, frame rate and frame count.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Drops the decoder and container. Calling it twice is a no-op.
    fn close(&mut self);
}
