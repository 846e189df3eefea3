pub mod face_embedder;
pub mod face_matcher;
pub mod identity_catalog;
pub mod reference_gallery;
