// src/extractors/docx.rs
//
// A .docx file is a ZIP of XML parts; docx-rs parses it into
//   Document -> DocumentChild::{Paragraph, Table}
//   Paragraph -> ParagraphChild::Run -> RunChild::Text
//   Table -> TableRow -> TableCell -> Paragraph
use std::fs;
use std::path::Path;

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use crate::utils::error::ExtractError;

/// Extracts body paragraphs first (skipping blank ones), then every table row
/// as tab-joined cell text, all joined with newlines.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    let docx = read_docx(&bytes)
        .map_err(|e| ExtractError::Docx(format!("{}: {:?}", path.display(), e)))?;

    let mut chunks: Vec<String> = Vec::new();
    let mut tables: Vec<&Table> = Vec::new();

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => {
                let text = paragraph_text(para);
                if !text.trim().is_empty() {
                    chunks.push(text);
                }
            }
            DocumentChild::Table(table) => tables.push(table),
            _ => {}
        }
    }

    for table in tables {
        for child in &table.rows {
            if let TableChild::TableRow(row) = child {
                let cells: Vec<String> = row.cells.iter().map(cell_text).collect();
                chunks.push(cells.join("\t"));
            }
        }
    }

    tracing::debug!("DOCX {} yielded {} text chunks", path.display(), chunks.len());
    Ok(chunks.join("\n").trim().to_string())
}

fn cell_text(child: &TableRowChild) -> String {
    let mut paragraphs = Vec::new();
    if let TableRowChild::TableCell(cell) = child {
        for content in &cell.children {
            if let TableCellContent::Paragraph(p) = content {
                paragraphs.push(paragraph_text(p));
            }
        }
    }
    paragraphs.join("\n").trim().to_string()
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&para.children, &mut text);
    text
}

fn push_children_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, out),
            _ => {}
        }
    }
}
