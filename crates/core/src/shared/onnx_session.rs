use std::path::Path;

/// Return the preferred ONNX execution providers for the current platform.
///
/// ONNX Runtime falls back to CPU when the platform-specific provider is
/// unavailable, so an empty list simply means CPU.
pub fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// Loads an ONNX model with full graph optimization and the platform's
/// preferred execution providers.
///
/// Intra-op parallelism uses every available core; frames are processed one
/// at a time, so inter-op parallelism stays at 1.
pub fn load_session(
    model_path: &Path,
) -> Result<ort::session::Session, Box<dyn std::error::Error>> {
    let intra_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let session = ort::session::Session::builder()?
        .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
        .with_inter_threads(1)?
        .with_intra_threads(intra_threads)?
        .with_execution_providers(preferred_execution_providers())?
        .commit_from_file(model_path)?;

    log::debug!("Loaded ONNX model {}", model_path.display());
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_session_missing_model_fails() {
        assert!(load_session(Path::new("/nonexistent/model.onnx")).is_err());
    }

    #[test]
    fn test_load_session_rejects_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();
        assert!(load_session(&path).is_err());
    }
}
