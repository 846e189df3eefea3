use std::time::Instant;

use crate::annotation::domain::label_painter::LabelPainter;
use crate::detection::domain::face_detector::FaceDetector;
use crate::recognition::domain::face_matcher::{FaceMatcher, IdentityMatch};
use crate::shared::constants::UNKNOWN_LABEL;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

use super::pipeline_logger::PipelineLogger;

/// A face that was recognized (or not) and drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedFace {
    /// Detector box clamped to the frame.
    pub region: FaceRegion,
    pub label: String,
    pub identity: Option<IdentityMatch>,
}

impl AnnotatedFace {
    pub fn is_unknown(&self) -> bool {
        self.identity.is_none()
    }
}

/// What happened to one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameAnnotation {
    pub faces: Vec<AnnotatedFace>,
    /// Detections whose clamped box had no area.
    pub empty_crops: usize,
    /// Regions skipped because the matcher failed.
    pub recognition_failures: usize,
    /// The detector errored and the frame was passed through.
    pub detection_failed: bool,
}

impl FrameAnnotation {
    pub fn labeled_count(&self) -> usize {
        self.faces.iter().filter(|f| !f.is_unknown()).count()
    }

    pub fn unknown_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_unknown()).count()
    }
}

/// Detects faces in a frame, identifies each against the known references,
/// and draws a labeled box around it.
///
/// Every failure below the frame level is contained here: a failed
/// detection leaves the frame unmodified and a failed match skips only that
/// region.
pub struct FrameAnnotator {
    detector: Box<dyn FaceDetector>,
    matcher: Box<dyn FaceMatcher>,
    painter: Box<dyn LabelPainter>,
}

impl FrameAnnotator {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        matcher: Box<dyn FaceMatcher>,
        painter: Box<dyn LabelPainter>,
    ) -> Self {
        Self {
            detector,
            matcher,
            painter,
        }
    }

    pub fn annotate(&mut self, frame: &mut Frame, logger: &mut dyn PipelineLogger) -> FrameAnnotation {
        let mut annotation = FrameAnnotation::default();

        let t0 = Instant::now();
        let regions = match self.detector.detect(frame) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("Face detection failed on frame {}: {e}", frame.index());
                annotation.detection_failed = true;
                Vec::new()
            }
        };
        logger.timing("detect", t0.elapsed().as_secs_f64() * 1000.0);

        if regions.is_empty() {
            return annotation;
        }

        // Identify every face before drawing so no crop sees another face's box.
        let t1 = Instant::now();
        let mut pending = Vec::with_capacity(regions.len());
        for region in &regions {
            let clamped = region.clamp(frame.width(), frame.height());
            let Some(crop) = frame.crop(&clamped) else {
                log::debug!("Skipping {region} on frame {}: empty crop", frame.index());
                annotation.empty_crops += 1;
                continue;
            };

            match self.matcher.find(&crop) {
                Ok(identity) => pending.push((clamped, identity)),
                Err(e) => {
                    log::warn!("Error recognizing face {}: {e}", region.face_id);
                    annotation.recognition_failures += 1;
                }
            }
        }
        logger.timing("match", t1.elapsed().as_secs_f64() * 1000.0);

        for (region, identity) in pending {
            let label = identity
                .as_ref()
                .map(|m| m.label.clone())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

            if let Err(e) = self.painter.paint(frame, &region, &label) {
                log::warn!("Could not draw {region} on frame {}: {e}", frame.index());
            }

            annotation.faces.push(AnnotatedFace {
                region,
                label,
                identity,
            });
        }

        annotation
    }
}
