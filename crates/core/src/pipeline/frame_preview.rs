use crate::shared::frame::Frame;

/// Optional live view of annotated frames.
///
/// Display problems never abort a run, so `show` has no error channel;
/// implementations log their own failures.
pub trait FramePreview: Send {
    fn show(&mut self, frame: &Frame);

    /// Releases any display resources. Default: no-op.
    fn close(&mut self) {}
}

/// Headless preview that shows nothing.
pub struct NullFramePreview;

impl FramePreview for NullFramePreview {
    fn show(&mut self, _frame: &Frame) {}
}
