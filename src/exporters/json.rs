// src/exporters/json.rs
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::schema::OrganizedOutput;
use crate::utils::error::ExportError;

/// Serializes with 4-space indentation; absent optional fields are left out.
pub fn to_json_string(output: &OrganizedOutput) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    output.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| ExportError::Encoding(e.to_string()))
}

pub fn save_to_json(output: &OrganizedOutput, path: &Path) -> Result<(), ExportError> {
    fs::write(path, to_json_string(output)?)?;
    tracing::info!("Saved JSON to {}", path.display());
    Ok(())
}

/// Loads a previously exported document, validating it against the schema types.
pub fn load_from_json(path: &Path) -> Result<OrganizedOutput, ExportError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
