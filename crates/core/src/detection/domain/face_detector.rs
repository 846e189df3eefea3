use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Finds face bounding boxes in a frame.
///
/// Used both on video frames and on reference photos. An empty vector
/// means no faces; boxes may extend past the frame edges, so callers clamp.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>>;
}
