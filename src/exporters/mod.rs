// src/exporters/mod.rs
pub mod csv;
pub mod docx;
pub mod json;
pub mod latex;

use std::path::{Path, PathBuf};

use crate::schema::OrganizedOutput;
use crate::utils::error::ExportError;

/// Output formats an `OrganizedOutput` can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Docx,
    Csv,
    Latex,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Docx => "docx",
            ExportFormat::Csv => "csv",
            ExportFormat::Latex => "tex",
        }
    }
}

/// Where an export goes when no destination is given: the input path with
/// the format's extension.
pub fn default_path(input: &Path, format: ExportFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Writes `output` to `path` in the requested format.
pub fn export(output: &OrganizedOutput, format: ExportFormat, path: &Path) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => json::save_to_json(output, path),
        ExportFormat::Docx => docx::save_to_docx(output, path),
        ExportFormat::Csv => csv::save_to_csv(output, path),
        ExportFormat::Latex => latex::save_to_latex(output, path),
    }
}
