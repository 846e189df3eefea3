use std::fmt;

/// A detected facial area in frame coordinates.
///
/// Corners follow the `(x1, y1)`–`(x2, y2)` convention with exclusive
/// right/bottom edges, so `x2 - x1` is the pixel width. Coordinates may lie
/// outside the frame until [`FaceRegion::clamp`] is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRegion {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Per-frame identifier, 1-based in detector order.
    pub face_id: u32,
    pub confidence: f64,
}

impl FaceRegion {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, face_id: u32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            face_id,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// True when the rectangle covers no pixels (inverted or degenerate).
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Restricts the rectangle to `[0, frame_w) x [0, frame_h)`.
    ///
    /// A rectangle lying entirely outside the frame collapses to zero area.
    pub fn clamp(&self, frame_w: u32, frame_h: u32) -> FaceRegion {
        let fw = frame_w as i32;
        let fh = frame_h as i32;
        let x1 = self.x1.clamp(0, fw);
        let y1 = self.y1.clamp(0, fh);
        FaceRegion {
            x1,
            y1,
            x2: self.x2.clamp(x1, fw),
            y2: self.y2.clamp(y1, fh),
            face_id: self.face_id,
            confidence: self.confidence,
        }
    }
}

impl fmt::Display for FaceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "face_{} [{}, {}, {}, {}]",
            self.face_id, self.x1, self.y1, self.x2, self.y2
        )
    }
}
