use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::PipelineError;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::frame_annotator::{FrameAnnotation, FrameAnnotator};
use super::frame_preview::FramePreview;
use super::pipeline_logger::PipelineLogger;

/// Lifecycle of a run. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Opened,
    Streaming,
    Draining,
    Closed,
}

/// Counters for a finished run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub frames_read: usize,
    pub frames_written: usize,
    pub faces_detected: usize,
    pub faces_labeled: usize,
    pub unknown_faces: usize,
    pub recognition_failures: usize,
    pub empty_crops: usize,
    pub detection_failures: usize,
    /// Stopped early on a quit request.
    pub interrupted: bool,
}

impl RunSummary {
    fn record(&mut self, annotation: &FrameAnnotation) {
        self.faces_detected += annotation.faces.len()
            + annotation.recognition_failures
            + annotation.empty_crops;
        self.faces_labeled += annotation.labeled_count();
        self.unknown_faces += annotation.unknown_count();
        self.recognition_failures += annotation.recognition_failures;
        self.empty_crops += annotation.empty_crops;
        if annotation.detection_failed {
            self.detection_failures += 1;
        }
    }
}

/// Annotates every frame of a source video and writes the result.
///
/// Output frame N is input frame N with its faces boxed and labeled; the
/// output keeps the source resolution and (integer) frame rate. Reader and
/// writer are released on every exit path once opened. Single-use: a
/// second `execute` fails with [`PipelineError::AlreadyExecuted`].
pub struct RecognizeFacesUseCase {
    reader: Box<dyn VideoReader>,
    writer: Box<dyn VideoWriter>,
    annotator: FrameAnnotator,
    preview: Box<dyn FramePreview>,
    logger: Box<dyn PipelineLogger>,
    cancelled: Arc<AtomicBool>,
    state: PipelineState,
    executed: bool,
}

impl RecognizeFacesUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        annotator: FrameAnnotator,
        preview: Box<dyn FramePreview>,
        logger: Box<dyn PipelineLogger>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            reader,
            writer,
            annotator,
            preview,
            logger,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            state: PipelineState::Idle,
            executed: false,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn execute(&mut self, source: &Path, output: &Path) -> Result<RunSummary, PipelineError> {
        if self.executed {
            return Err(PipelineError::AlreadyExecuted);
        }
        self.executed = true;

        let metadata = self.open(source, output)?;
        self.state = PipelineState::Opened;
        self.logger.info(&format!(
            "Annotating {} ({}x{} @ {:.2} fps) -> {}",
            source.display(),
            metadata.width,
            metadata.height,
            metadata.fps,
            output.display()
        ));

        let mut summary = RunSummary::default();
        self.state = PipelineState::Streaming;
        let streamed = self.stream(&metadata, &mut summary);

        self.state = PipelineState::Draining;
        self.preview.close();
        self.reader.close();
        let finalized = self.writer.close();
        self.state = PipelineState::Closed;

        streamed?;
        finalized.map_err(|e| PipelineError::SinkFinalize {
            path: output.to_path_buf(),
            reason: e.to_string(),
        })?;

        self.logger.summary();
        log::info!(
            "{} frames written, {} faces found ({} labeled, {} unknown)",
            summary.frames_written,
            summary.faces_detected,
            summary.faces_labeled,
            summary.unknown_faces
        );
        Ok(summary)
    }

    /// Opens source then sink. Whatever was opened is released again if a
    /// later step fails.
    fn open(&mut self, source: &Path, output: &Path) -> Result<VideoMetadata, PipelineError> {
        let metadata = match self.reader.open(source) {
            Ok(metadata) => metadata,
            Err(e) => {
                self.reader.close();
                self.state = PipelineState::Closed;
                return Err(PipelineError::SourceUnavailable {
                    path: source.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        if let Err(reason) = metadata.validate() {
            self.reader.close();
            self.state = PipelineState::Closed;
            return Err(PipelineError::InvalidStreamMetadata {
                path: source.to_path_buf(),
                reason,
            });
        }

        if let Err(e) = self.writer.open(output, &metadata) {
            self.reader.close();
            let _ = self.writer.close();
            self.state = PipelineState::Closed;
            return Err(PipelineError::SinkUnavailable {
                path: output.to_path_buf(),
                reason: e.to_string(),
            });
        }

        Ok(metadata)
    }

    fn stream(
        &mut self,
        metadata: &VideoMetadata,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let Self {
            reader,
            writer,
            annotator,
            preview,
            logger,
            cancelled,
            ..
        } = self;

        for result in reader.frames() {
            let mut frame = result.map_err(|e| PipelineError::FrameRead {
                index: summary.frames_read,
                reason: e.to_string(),
            })?;
            summary.frames_read += 1;

            let annotation = annotator.annotate(&mut frame, logger.as_mut());
            summary.record(&annotation);
            logger.metric("faces", annotation.faces.len() as f64);

            let t0 = Instant::now();
            writer.write(&frame).map_err(|e| PipelineError::FrameWrite {
                index: frame.index(),
                reason: e.to_string(),
            })?;
            logger.timing("write", t0.elapsed().as_secs_f64() * 1000.0);
            summary.frames_written += 1;

            preview.show(&frame);
            logger.progress(summary.frames_read, metadata.total_frames);

            if cancelled.load(Ordering::Relaxed) {
                log::info!("Stopping after frame {}", frame.index());
                summary.interrupted = true;
                break;
            }
        }
        Ok(())
    }
}
