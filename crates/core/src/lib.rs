pub mod annotation;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod recognition;
pub mod shared;
pub mod video;
