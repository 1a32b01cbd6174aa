// src/extractors/image.rs
use std::path::Path;
use std::process::Command;

use crate::utils::error::ExtractError;

/// Runs the tesseract CLI over an image and returns its stdout.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    binary: String,
    lang: String,
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrEngine {
    pub fn new(binary: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }

    /// OCRs a PNG/JPEG file. The trimmed recognized text is returned.
    pub fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        // tesseract reports a missing input on stderr; surface it as I/O like the other engines
        if !path.exists() {
            return Err(ExtractError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("image not found: {}", path.display()),
            )));
        }

        tracing::debug!("Running {} on {} (lang {})", self.binary, path.display(), self.lang);
        let output = Command::new(&self.binary)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| ExtractError::Ocr(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("{} exited with {}: {}", self.binary, output.status, stderr.trim());
            return Err(ExtractError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
