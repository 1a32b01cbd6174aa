// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::error::StorageError;

/// Base name used when the aligned document has no title.
pub const DEFAULT_TITLE: &str = "output_QA";

/// Keeps alphanumerics, spaces, hyphens and underscores; everything else becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The JSON/DOCX pair written for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPair {
    pub json: PathBuf,
    pub docx: PathBuf,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified output directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Output paths for a (raw, unsanitized) title: `{title}_Q&A.json` / `.docx`.
    pub fn output_pair(&self, title: &str) -> OutputPair {
        let stem = format!("{}_Q&A", sanitize_filename(title));
        OutputPair {
            json: self.base_dir.join(format!("{}.json", stem)),
            docx: self.base_dir.join(format!("{}.docx", stem)),
        }
    }

    /// Writes both files of a job or neither. Contents are staged in temporary
    /// files and renamed into place; an existing pair with the same title is
    /// replaced (last writer wins). If placing the DOCX fails after the JSON was
    /// placed, both final names are removed, so a previous pair is lost rather
    /// than left half-replaced.
    pub fn save_pair(&self, title: &str, json: &[u8], docx: &[u8]) -> Result<OutputPair, StorageError> {
        let pair = self.output_pair(title);
        let json_tmp = with_tmp_suffix(&pair.json);
        let docx_tmp = with_tmp_suffix(&pair.docx);

        let staged = fs::write(&json_tmp, json).and_then(|_| fs::write(&docx_tmp, docx));
        if let Err(e) = staged {
            let _ = fs::remove_file(&json_tmp);
            let _ = fs::remove_file(&docx_tmp);
            return Err(StorageError::IoError(e));
        }

        if let Err(e) = fs::rename(&json_tmp, &pair.json) {
            let _ = fs::remove_file(&json_tmp);
            let _ = fs::remove_file(&docx_tmp);
            return Err(StorageError::IoError(e));
        }
        if let Err(e) = fs::rename(&docx_tmp, &pair.docx) {
            // the new JSON already replaced any previous one; drop the previous DOCX too
            tracing::error!("Failed to place {}, removing both outputs for '{}'", pair.docx.display(), title);
            let _ = fs::remove_file(&pair.json);
            let _ = fs::remove_file(&pair.docx);
            let _ = fs::remove_file(&docx_tmp);
            return Err(StorageError::IoError(e));
        }

        tracing::info!("Saved {} and {}", pair.json.display(), pair.docx.display());
        Ok(pair)
    }

    /// Finds the output pair for a title; both files must exist.
    pub fn locate(&self, title: &str) -> Result<OutputPair, StorageError> {
        let pair = self.output_pair(title);
        for path in [&pair.json, &pair.docx] {
            if !path.is_file() {
                tracing::warn!("Requested output {} does not exist", path.display());
                return Err(StorageError::MissingFile(path.display().to_string()));
            }
        }
        Ok(pair)
    }
}

fn with_tmp_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
