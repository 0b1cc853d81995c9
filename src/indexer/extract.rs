use crate::search::tokenizer::tokenize_text;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File extensions treated as images, compared ignoring ASCII case.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Produces the keywords a file should be findable by.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<String>>;
}

/// Keywords from the file stem plus an optional `<file>.txt` sidecar next to it.
///
/// The sidecar carries text recognised elsewhere (e.g. by an OCR pass).
#[derive(Debug, Default, Clone)]
pub struct FileNameExtractor;

impl FileNameExtractor {
    pub fn sidecar_path(path: &Path) -> PathBuf {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(".txt");
        PathBuf::from(sidecar)
    }
}

impl KeywordExtractor for FileNameExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let mut keywords = path
            .file_stem()
            .map(|stem| tokenize_text(&stem.to_string_lossy()))
            .unwrap_or_default();

        let sidecar = Self::sidecar_path(path);
        match std::fs::read_to_string(&sidecar) {
            Ok(text) => keywords.extend(tokenize_text(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read sidecar {}", sidecar.display()));
            }
        }

        Ok(keywords.into_iter().collect())
    }
}
