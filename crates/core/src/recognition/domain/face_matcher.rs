use std::path::PathBuf;

use crate::shared::frame::Frame;

/// The best reference image found for a face crop.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityMatch {
    pub label: String,
    pub reference_path: PathBuf,
    /// Cosine distance to the reference; lower is closer.
    pub distance: f64,
}

/// Domain interface for looking up a face crop among the known identities.
///
/// `Ok(None)` means the face matches no reference. Implementations must not
/// re-run strict detection on the crop: it is already a face.
pub trait FaceMatcher: Send {
    fn find(&self, face: &Frame) -> Result<Option<IdentityMatch>, Box<dyn std::error::Error>>;
}
