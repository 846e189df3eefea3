use crate::detection::domain::face_detector::FaceDetector;
use crate::recognition::domain::face_embedder::FaceEmbedder;
use crate::recognition::domain::face_matcher::{FaceMatcher, IdentityMatch};
use crate::recognition::domain::identity_catalog::IdentityCatalog;
use crate::recognition::domain::reference_gallery::ReferenceGallery;
use crate::recognition::infrastructure::embedding_cache::CachedFaceEmbedder;
use crate::shared::frame::Frame;
use crate::video::domain::image_reader::ImageReader;

/// Matches face crops against a pre-embedded [`ReferenceGallery`].
///
/// Crops are embedded as-is: the detector already localized the face, so no
/// second detection pass runs here.
pub struct GalleryFaceMatcher {
    embedder: Box<dyn FaceEmbedder>,
    gallery: ReferenceGallery,
    threshold: f64,
}

impl GalleryFaceMatcher {
    pub fn new(embedder: Box<dyn FaceEmbedder>, gallery: ReferenceGallery, threshold: f64) -> Self {
        Self {
            embedder,
            gallery,
            threshold,
        }
    }

    /// Embeds the catalog's references and returns a matcher over them.
    ///
    /// Reference images with identical content are embedded once. The memo
    /// table is dropped before matching starts; video crops go straight to
    /// `embedder`.
    pub fn from_references(
        catalog: &IdentityCatalog,
        reader: &dyn ImageReader,
        detector: &mut dyn FaceDetector,
        embedder: Box<dyn FaceEmbedder>,
        threshold: f64,
    ) -> Self {
        let cached = CachedFaceEmbedder::new(embedder);
        let gallery = ReferenceGallery::build(catalog, reader, detector, &cached);
        if cached.hits() > 0 {
            log::info!(
                "{} duplicate reference images reused an existing embedding",
                cached.hits()
            );
        }
        Self::new(cached.into_inner(), gallery, threshold)
    }
}

impl FaceMatcher for GalleryFaceMatcher {
    fn find(&self, face: &Frame) -> Result<Option<IdentityMatch>, Box<dyn std::error::Error>> {
        if self.gallery.is_empty() {
            return Ok(None);
        }
        let embedding = self.embedder.embed(face)?;
        let found = self.gallery.nearest(&embedding, self.threshold);
        if let Some(ref m) = found {
            log::trace!(
                "Face in frame {} matched {} (distance {:.3})",
                face.index(),
                m.label,
                m.distance
            );
        }
        Ok(found)
    }
}
