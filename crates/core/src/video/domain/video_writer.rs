use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Sink for annotated frames.
///
/// The output keeps the source's width, height and frame rate; every frame
/// passed to `write` must match the geometry given to `open`.
pub trait VideoWriter: Send {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes buffered packets and writes the trailer. No-op if never
    /// opened or already closed.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
