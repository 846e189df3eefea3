pub mod frame_annotator;
pub mod frame_preview;
pub mod infrastructure;
pub mod pipeline_logger;
pub mod recognition_config;
pub mod recognize_faces_use_case;
