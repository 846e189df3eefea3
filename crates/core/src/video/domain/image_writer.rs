use std::path::Path;

use crate::shared::frame::Frame;

/// Saves a still frame, e.g. the preview snapshot.
///
/// The format is taken from the path's extension. With `size` the frame is
/// resampled to exactly those dimensions first.
pub trait ImageWriter: Send {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
