use std::path::PathBuf;

use crate::detection::domain::face_detector::FaceDetector;
use crate::recognition::domain::face_embedder::FaceEmbedder;
use crate::recognition::domain::face_matcher::IdentityMatch;
use crate::recognition::domain::identity_catalog::{IdentityCatalog, ReferenceImage};
use crate::shared::frame::Frame;
use crate::shared::math::cosine_distance;
use crate::video::domain::image_reader::ImageReader;

/// One embedded reference image.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryEntry {
    pub label: String,
    pub path: PathBuf,
    pub embedding: Vec<f32>,
}

/// In-memory embeddings of every usable reference image, in catalog order.
#[derive(Clone, Debug, Default)]
pub struct ReferenceGallery {
    entries: Vec<GalleryEntry>,
}

impl ReferenceGallery {
    pub fn new(entries: Vec<GalleryEntry>) -> Self {
        Self { entries }
    }

    /// Embeds the face in every catalog reference.
    ///
    /// The largest detected face is used; when none is found (or detection
    /// fails) the whole image is embedded. References that cannot be
    /// decoded or embedded are logged and left out.
    pub fn build(
        catalog: &IdentityCatalog,
        reader: &dyn ImageReader,
        detector: &mut dyn FaceDetector,
        embedder: &dyn FaceEmbedder,
    ) -> Self {
        let mut entries = Vec::with_capacity(catalog.references().len());

        for reference in catalog.references() {
            match embed_reference(reference, reader, detector, embedder) {
                Ok(embedding) => entries.push(GalleryEntry {
                    label: reference.label.clone(),
                    path: reference.path.clone(),
                    embedding,
                }),
                Err(e) => log::warn!(
                    "Skipping reference image {}: {e}",
                    reference.path.display()
                ),
            }
        }

        log::info!(
            "Embedded {} of {} reference images",
            entries.len(),
            catalog.references().len()
        );
        Self { entries }
    }

    /// Closest reference within `threshold` (cosine distance, inclusive).
    ///
    /// Equal distances resolve to the earlier reference.
    pub fn nearest(&self, embedding: &[f32], threshold: f64) -> Option<IdentityMatch> {
        let mut best: Option<(&GalleryEntry, f64)> = None;
        for entry in &self.entries {
            let distance = cosine_distance(embedding, &entry.embedding);
            if distance > threshold {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((entry, distance));
            }
        }

        best.map(|(entry, distance)| IdentityMatch {
            label: entry.label.clone(),
            reference_path: entry.path.clone(),
            distance,
        })
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn embed_reference(
    reference: &ReferenceImage,
    reader: &dyn ImageReader,
    detector: &mut dyn FaceDetector,
    embedder: &dyn FaceEmbedder,
) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let image = reader.read(&reference.path)?;
    let face = largest_face(&image, detector).unwrap_or(image);
    embedder.embed(&face)
}

fn largest_face(image: &Frame, detector: &mut dyn FaceDetector) -> Option<Frame> {
    let regions = match detector.detect(image) {
        Ok(regions) => regions,
        Err(e) => {
            log::debug!("Face detection failed on reference image: {e}");
            return None;
        }
    };

    regions
        .iter()
        .map(|r| r.clamp(image.width(), image.height()))
        .filter(|r| !r.is_empty())
        .max_by_key(|r| r.area())
        .and_then(|r| image.crop(&r))
}
