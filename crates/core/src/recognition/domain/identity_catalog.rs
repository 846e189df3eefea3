use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::shared::constants::{IMAGE_EXTENSIONS, LABEL_DELIMITER};

/// One labeled image in the reference directory.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceImage {
    pub label: String,
    pub path: PathBuf,
}

/// The known identities found in a reference directory.
///
/// Labels are unique and kept in first-seen order; references keep every
/// qualifying image so several pictures of one person all take part in
/// matching.
#[derive(Clone, Debug, Default)]
pub struct IdentityCatalog {
    labels: Vec<String>,
    references: Vec<ReferenceImage>,
}

impl IdentityCatalog {
    /// Scans `dir` for image files and derives a label from each filename.
    ///
    /// Files are visited in lexicographic order. A missing or unreadable
    /// directory is an error; an empty one yields an empty catalog.
    pub fn load(dir: &Path) -> Result<Self, PipelineError> {
        let unavailable = |source| PipelineError::ReferenceDirUnavailable {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            let path = entry.path();
            if path.is_file() && is_image(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Self::default();
        for path in paths {
            match identity_label(&path) {
                Some(label) => catalog.insert(label, path),
                None => log::debug!(
                    "Skipping {}: file name has no identity before '{LABEL_DELIMITER}'",
                    path.display()
                ),
            }
        }

        if catalog.is_empty() {
            log::warn!(
                "No reference images found in {}; every face will be labeled Unknown",
                dir.display()
            );
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, label: String, path: PathBuf) {
        if !self.contains(&label) {
            self.labels.push(label.clone());
        }
        self.references.push(ReferenceImage { label, path });
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn references(&self) -> &[ReferenceImage] {
        &self.references
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Derives the identity from a reference filename: the part of the file
/// stem before the first `_` (`alice_2.jpg` → `alice`).
///
/// Accepts a bare filename or a full path. Returns `None` when the stem is
/// empty or starts with the delimiter.
pub fn identity_label(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let label = stem.split(LABEL_DELIMITER).next()?;
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
