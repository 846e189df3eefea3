pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Separates the identity from the rest of a reference filename.
pub const LABEL_DELIMITER: char = '_';

/// Label drawn when no reference image matches a face.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Box and label color (RGB).
pub const HIGHLIGHT_COLOR: [u8; 3] = [0, 255, 0];
pub const BOX_THICKNESS: u32 = 2;
/// Vertical gap between the label baseline area and the box top edge.
pub const LABEL_OFFSET: i32 = 10;
pub const LABEL_FONT_SIZE: f32 = 24.0;

/// Cosine distance cut-off for ArcFace embeddings.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.68;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

pub const PREVIEW_FILE_NAME: &str = "preview.jpg";
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "classroom_output.mp4";
