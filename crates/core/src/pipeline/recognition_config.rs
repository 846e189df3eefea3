use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::shared::constants::{
    DEFAULT_CONFIDENCE, DEFAULT_MATCH_THRESHOLD, DEFAULT_OUTPUT_FILE_NAME,
};

/// Paths and tuning for one recognition run.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub source_video_path: PathBuf,
    pub reference_image_dir: PathBuf,
    pub output_dir: PathBuf,
    /// `None` means `<source stem>_output.mp4`. The built-in default names
    /// the output of the bundled classroom clip.
    pub output_file_name: Option<String>,
    pub preview_enabled: bool,
    /// Write the preview snapshot every this many frames.
    pub preview_interval: usize,
    pub confidence: f64,
    pub match_threshold: f64,
    pub font_path: Option<PathBuf>,
    /// Directory searched for bundled ONNX models before downloading.
    pub models_dir: Option<PathBuf>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            source_video_path: PathBuf::from("data/video/classroom_light.mp4"),
            reference_image_dir: PathBuf::from("data/students"),
            output_dir: PathBuf::from("output"),
            output_file_name: Some(DEFAULT_OUTPUT_FILE_NAME.to_string()),
            preview_enabled: false,
            preview_interval: 5,
            confidence: DEFAULT_CONFIDENCE,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            font_path: None,
            models_dir: None,
        }
    }
}

impl RecognitionConfig {
    /// Reads a JSON config file. Keys that are absent take their defaults.
    ///
    /// A file that picks its own source but no output name gets the
    /// source-stem name rather than the classroom default.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let invalid = |e: serde_json::Error| {
            PipelineError::InvalidConfig(format!("{}: {e}", path.display()))
        };
        let json = fs::read_to_string(path).map_err(|e| {
            PipelineError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let value: serde_json::Value = serde_json::from_str(&json).map_err(invalid)?;
        let names_source = value.get("source_video_path").is_some();
        let names_output = value.get("output_file_name").is_some();

        let mut config: Self = serde_json::from_value(value).map_err(invalid)?;
        if names_source && !names_output {
            config.output_file_name = None;
        }
        Ok(config)
    }

    /// Switches the source video. The classroom default output name is
    /// dropped so the output follows the new source's stem.
    pub fn set_source(&mut self, path: PathBuf) {
        if self.output_file_name.as_deref() == Some(DEFAULT_OUTPUT_FILE_NAME) {
            self.output_file_name = None;
        }
        self.source_video_path = path;
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(PipelineError::InvalidConfig(format!(
                "confidence must be between 0 and 1, got {}",
                self.confidence
            )));
        }
        if !(0.0..=2.0).contains(&self.match_threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "match threshold must be a cosine distance between 0 and 2, got {}",
                self.match_threshold
            )));
        }
        if self.preview_interval == 0 {
            return Err(PipelineError::InvalidConfig(
                "preview interval must be at least 1".to_string(),
            ));
        }
        if let Some(name) = &self.output_file_name {
            if name.is_empty() || Path::new(name).file_name() != Some(OsStr::new(name)) {
                return Err(PipelineError::InvalidConfig(format!(
                    "output file name must be a bare file name, got {name:?}"
                )));
            }
        }
        Ok(())
    }

    /// Full path of the annotated video.
    pub fn output_path(&self) -> PathBuf {
        let name = match &self.output_file_name {
            Some(name) => name.clone(),
            None => {
                let stem = self
                    .source_video_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("video");
                format!("{stem}_output.mp4")
            }
        };
        self.output_dir.join(name)
    }
}
