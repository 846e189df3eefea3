use crate::shared::frame::Frame;

/// Domain interface for turning a face crop into an identity embedding.
///
/// Implementations return L2-normalized vectors so cosine distance reduces
/// to a dot product.
pub trait FaceEmbedder: Send {
    fn embed(&self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>>;
}
