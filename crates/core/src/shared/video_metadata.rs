use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Container estimate; 0 when the stream does not report it.
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Checks that geometry and frame rate are usable for encoding.
    ///
    /// Returns a description of the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "non-positive resolution {}x{}",
                self.width, self.height
            ));
        }
        if !self.fps.is_finite() || self.fps.round() < 1.0 {
            return Err(format!("non-positive frame rate {}", self.fps));
        }
        Ok(())
    }

    /// Frame rate as the integer the encoder is configured with.
    pub fn integer_fps(&self) -> i32 {
        self.fps.round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn meta(width: u32, height: u32, fps: f64) -> VideoMetadata {
        VideoMetadata {
            width,
            height,
            fps,
            total_frames: 90,
            codec: "h264".to_string(),
            source_path: Some(PathBuf::from("/tmp/test.mp4")),
        }
    }

    #[test]
    fn test_valid_metadata() {
        assert!(meta(1920, 1080, 29.97).validate().is_ok());
    }

    #[rstest]
    #[case(0, 1080, 30.0)]
    #[case(1920, 0, 30.0)]
    #[case(1920, 1080, 0.0)]
    #[case(1920, 1080, 0.2)]
    #[case(1920, 1080, f64::NAN)]
    fn test_invalid_metadata(#[case] w: u32, #[case] h: u32, #[case] fps: f64) {
        assert!(meta(w, h, fps).validate().is_err());
    }

    #[test]
    fn test_integer_fps_rounds() {
        assert_eq!(meta(10, 10, 29.97).integer_fps(), 30);
        assert_eq!(meta(10, 10, 24.0).integer_fps(), 24);
    }

    #[test]
    fn test_clone_is_equal() {
        let m = meta(640, 480, 24.0);
        assert_eq!(m.clone(), m);
    }
}
