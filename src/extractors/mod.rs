// src/extractors/mod.rs
pub mod docx;
pub mod image;
pub mod pdf;

use std::path::Path;

use crate::utils::error::ExtractError;
use self::image::OcrEngine;

/// The extraction path a file is routed to, decided purely by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
    Image,
}

impl SourceKind {
    /// Routes a path by its (case-insensitive) extension without touching the filesystem.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(SourceKind::Pdf),
            "docx" => Ok(SourceKind::Docx),
            "png" | "jpg" | "jpeg" => Ok(SourceKind::Image),
            _ => Err(ExtractError::UnsupportedFileType(path.display().to_string())),
        }
    }
}

// --- Main Extractor Structure ---
pub struct TextExtractor {
    ocr: OcrEngine,
}

impl TextExtractor {
    pub fn new(ocr: OcrEngine) -> Self {
        Self { ocr }
    }

    /// Extracts plain text from a PDF, DOCX or image file.
    /// Engine errors are returned as-is; there is no fallback between paths.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let kind = SourceKind::from_path(path)?;
        tracing::info!("Extracting text from {} as {:?}", path.display(), kind);

        let text = match kind {
            SourceKind::Pdf => pdf::extract_text(path)?,
            SourceKind::Docx => docx::extract_text(path)?,
            SourceKind::Image => self.ocr.extract_text(path)?,
        };

        tracing::info!("Extracted {} chars from {}", text.chars().count(), path.display());
        Ok(text)
    }
}
