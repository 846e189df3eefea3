use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::recognition::domain::face_embedder::FaceEmbedder;
use crate::shared::frame::Frame;

type ContentKey = [u8; 32];

/// Memoizes embeddings by the content of the face crop.
///
/// The key is a SHA-256 digest of the crop's dimensions and pixels, so a
/// reference photo present under two names is only pushed through the model
/// once. Entries are never evicted; wrap a bounded input set such as the
/// reference gallery, not the per-frame stream.
pub struct CachedFaceEmbedder {
    inner: Box<dyn FaceEmbedder>,
    cache: Mutex<HashMap<ContentKey, Vec<f32>>>,
    hits: AtomicUsize,
}

impl CachedFaceEmbedder {
    pub fn new(inner: Box<dyn FaceEmbedder>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the memo table and returns the wrapped embedder.
    pub fn into_inner(self) -> Box<dyn FaceEmbedder> {
        self.inner
    }
}

impl FaceEmbedder for CachedFaceEmbedder {
    fn embed(&self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let key = content_key(face);

        if let Some(hit) = self
            .cache
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?
            .get(&key)
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit.clone());
        }

        // Errors are not cached; a transient failure may succeed next time.
        let embedding = self.inner.embed(face)?;
        self.cache
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?
            .insert(key, embedding.clone());
        Ok(embedding)
    }
}

fn content_key(face: &Frame) -> ContentKey {
    let mut hasher = Sha256::new();
    hasher.update(face.width().to_le_bytes());
    hasher.update(face.height().to_le_bytes());
    hasher.update([face.channels()]);
    hasher.update(face.data());
    hasher.finalize().into()
}
