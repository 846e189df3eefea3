pub mod arcface_embedder;
pub mod embedding_cache;
pub mod gallery_face_matcher;
