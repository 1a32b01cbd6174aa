// src/extractors/pdf.rs
use std::path::Path;

use lopdf::Document;

use crate::utils::error::ExtractError;

/// Extracts the text of every page in order, newline-separated, trimmed at both ends.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let document = Document::load(path)
        .map_err(|e| ExtractError::Pdf(format!("{}: {}", path.display(), e)))?;

    let pages = document.get_pages();
    tracing::debug!("PDF {} has {} pages", path.display(), pages.len());

    let mut page_texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let text = document
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::Pdf(format!("page {}: {}", page_number, e)))?;
        page_texts.push(text);
    }

    Ok(page_texts.join("\n").trim().to_string())
}
