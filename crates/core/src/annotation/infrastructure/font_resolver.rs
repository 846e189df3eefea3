use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

/// Well-known locations of a plain sans-serif TrueType font.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Loads the label font.
///
/// An explicit `font_path` must load. Without one, the first readable system
/// candidate is used; `Ok(None)` means no font was found and labels will be
/// omitted (boxes are still drawn).
pub fn resolve_font(font_path: Option<&Path>) -> Result<Option<FontVec>, Box<dyn std::error::Error>> {
    if let Some(path) = font_path {
        return load_font(path)
            .map(Some)
            .map_err(|e| format!("cannot load font {}: {e}", path.display()).into());
    }

    let candidates: Vec<PathBuf> = SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect();
    Ok(first_loadable(&candidates))
}

fn first_loadable(candidates: &[PathBuf]) -> Option<FontVec> {
    for path in candidates.iter().filter(|p| p.is_file()) {
        match load_font(path) {
            Ok(font) => {
                log::debug!("Using label font {}", path.display());
                return Some(font);
            }
            Err(e) => log::debug!("Skipping font {}: {e}", path.display()),
        }
    }
    log::warn!("No usable system font found; faces will be boxed without labels");
    None
}

fn load_font(path: &Path) -> Result<FontVec, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    Ok(FontVec::try_from_vec(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_font_is_error() {
        let result = resolve_font(Some(Path::new("/nonexistent/font.ttf")));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_invalid_font_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let err = resolve_font(Some(&path)).err().unwrap();
        assert!(err.to_string().contains("broken.ttf"));
    }

    #[test]
    fn test_no_loadable_candidate_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("garbage.ttf");
        std::fs::write(&garbage, b"junk").unwrap();

        let candidates = vec![dir.path().join("missing.ttf"), garbage];
        assert!(first_loadable(&candidates).is_none());
    }
}
