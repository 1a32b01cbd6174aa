// src/exporters/csv.rs
//
// One row per top-level entry. Subquestions are not flattened into rows; the
// `subquestions` cell carries them as a compact JSON array.
use std::io::Write;
use std::path::Path;

use crate::schema::OrganizedOutput;
use crate::utils::error::ExportError;

const HEADER: [&str; 3] = ["question", "answer", "subquestions"];

pub fn write_csv<W: Write>(output: &OrganizedOutput, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for qa in &output.content {
        let subquestions = match &qa.subquestions {
            Some(subs) => serde_json::to_string(subs)?,
            None => String::new(),
        };
        csv_writer.write_record([
            qa.question.as_str(),
            qa.answer.as_deref().unwrap_or(""),
            subquestions.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_to_csv(output: &OrganizedOutput, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(output, file)?;
    tracing::info!("Saved CSV to {}", path.display());
    Ok(())
}
