use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Draws a face's bounding box and identity label onto a frame in place.
///
/// Regions reaching past the frame edge are clipped; a region entirely
/// outside the frame leaves it untouched.
pub trait LabelPainter: Send {
    fn paint(
        &self,
        frame: &mut Frame,
        region: &FaceRegion,
        label: &str,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
