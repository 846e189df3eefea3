use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a recognition run.
///
/// Per-region problems (empty crops, recognition errors) and detection
/// errors are recoverable and never surface here; they are counted in
/// the run summary instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("reference directory unavailable: {path}: {source}")]
    ReferenceDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot open source video {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("invalid stream metadata in {path}: {reason}")]
    InvalidStreamMetadata { path: PathBuf, reason: String },
    #[error("cannot open output video {path}: {reason}")]
    SinkUnavailable { path: PathBuf, reason: String },
    #[error("failed to read frame {index}: {reason}")]
    FrameRead { index: usize, reason: String },
    #[error("failed to write frame {index}: {reason}")]
    FrameWrite { index: usize, reason: String },
    #[error("failed to finalize output video {path}: {reason}")]
    SinkFinalize { path: PathBuf, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("pipeline already executed")]
    AlreadyExecuted,
}
