// src/exporters/docx.rs
use std::fs;
use std::io::Cursor;
use std::path::Path;

use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    LineSpacing, NumberFormat, Numbering, NumberingId, Paragraph, Run, Start, Style, StyleType,
};

use crate::schema::{subquestion_label, OrganizedOutput};
use crate::utils::error::ExportError;

const BULLET_NUMBERING_ID: usize = 2;
const TITLE_STYLE: &str = "Title";

/// One paragraph of the exported document, before any formatting is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    /// Bold label / italic value lines sharing one paragraph.
    Metadata(Vec<(&'static str, String)>),
    Bullet(String),
    Plain(String),
    Blank,
}

/// Lays out the document: title, metadata block, spacer, then each question
/// with its answer and lettered subquestions, followed by a blank paragraph.
pub fn layout(output: &OrganizedOutput) -> Vec<Block> {
    let mut blocks = Vec::new();
    let metadata = &output.metadata;

    if let Some(title) = output.title() {
        blocks.push(Block::Title(title.to_string()));
    }

    let lines: Vec<(&'static str, String)> = [
        ("Course", &metadata.course),
        ("Author", &metadata.author),
        ("Date", &metadata.date),
        ("Additional Info", &metadata.additional_info),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| (label, v.clone())))
    .collect();

    if !lines.is_empty() {
        blocks.push(Block::Metadata(lines));
    }
    blocks.push(Block::Blank);

    for (idx, qa) in output.content.iter().enumerate() {
        let n = idx + 1;
        blocks.push(Block::Bullet(format!("Q{}: {}", n, qa.question)));

        if let Some(answer) = qa.answer_text() {
            blocks.push(Block::Plain(format!("A{}: {}", n, answer)));
        }

        for (sub_idx, sub) in qa.subquestion_list().iter().enumerate() {
            let label = subquestion_label(sub_idx);
            blocks.push(Block::Bullet(format!("Q{}.{}: {}", n, label, sub.question)));
            blocks.push(Block::Plain(format!("A{}.{}: {}", n, label, sub.answer)));
        }

        blocks.push(Block::Blank);
    }

    blocks
}

fn to_paragraph(block: Block) -> Paragraph {
    let (paragraph, alignment) = match block {
        Block::Title(title) => (
            Paragraph::new()
                .add_run(Run::new().add_text(title).size(52).bold())
                .style(TITLE_STYLE),
            AlignmentType::Center,
        ),
        Block::Metadata(lines) => {
            let count = lines.len();
            let paragraph = lines
                .into_iter()
                .enumerate()
                .fold(Paragraph::new(), |p, (i, (label, value))| {
                    let p = p
                        .add_run(Run::new().add_text(format!("{}: ", label)).bold())
                        .add_run(Run::new().add_text(value).italic());
                    if i + 1 < count {
                        p.add_run(Run::new().add_break(BreakType::TextWrapping))
                    } else {
                        p
                    }
                });
            (paragraph, AlignmentType::Left)
        }
        Block::Bullet(text) => (
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0)),
            AlignmentType::Left,
        ),
        Block::Plain(text) => (
            Paragraph::new().add_run(Run::new().add_text(text)),
            AlignmentType::Left,
        ),
        Block::Blank => (Paragraph::new(), AlignmentType::Left),
    };

    // 8pt after (twentieths of a point), 1.5 lines (240ths of a line)
    paragraph
        .line_spacing(LineSpacing::new().after(160).line(360))
        .align(alignment)
}

fn build(output: &OrganizedOutput) -> Docx {
    let bullet_level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    );

    layout(output).into_iter().fold(
        Docx::new()
            .add_style(Style::new(TITLE_STYLE, StyleType::Paragraph).name(TITLE_STYLE))
            .add_abstract_numbering(
                AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(bullet_level),
            )
            .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID)),
        |docx, block| docx.add_paragraph(to_paragraph(block)),
    )
}

/// Renders the document to an in-memory .docx archive.
pub fn render(output: &OrganizedOutput) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    build(output)
        .build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buf.into_inner())
}

pub fn save_to_docx(output: &OrganizedOutput, path: &Path) -> Result<(), ExportError> {
    fs::write(path, render(output)?)?;
    tracing::info!("Saved DOCX to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors;
    use crate::schema::{Metadata, QuestionAnswer, Subquestion};

    fn qa(question: &str, answer: Option<&str>, subs: Option<Vec<(&str, &str)>>) -> QuestionAnswer {
        QuestionAnswer {
            question: question.into(),
            answer: answer.map(Into::into),
            subquestions: subs.map(|s| {
                s.into_iter()
                    .map(|(q, a)| Subquestion { question: q.into(), answer: a.into() })
                    .collect()
            }),
        }
    }

    #[test]
    fn test_subquestions_without_main_answer() {
        let output = OrganizedOutput {
            metadata: Metadata::default(),
            content: vec![qa("Consider f(x) = x + 1.", None, Some(vec![("f(0)?", "1"), ("f(1)?", "2")]))],
        };

        let blocks = layout(&output);
        assert_eq!(
            blocks,
            vec![
                Block::Blank,
                Block::Bullet("Q1: Consider f(x) = x + 1.".into()),
                Block::Bullet("Q1.a: f(0)?".into()),
                Block::Plain("A1.a: 1".into()),
                Block::Bullet("Q1.b: f(1)?".into()),
                Block::Plain("A1.b: 2".into()),
                Block::Blank,
            ]
        );
        assert!(!blocks.iter().any(|b| matches!(b, Block::Plain(t) if t.starts_with("A1:"))));
    }

    #[test]
    fn test_main_answer_and_subquestions_together() {
        let output = OrganizedOutput {
            metadata: Metadata::default(),
            content: vec![
                qa("First", Some("one"), None),
                qa("Second", Some("whole"), Some(vec![("part", "p")])),
            ],
        };

        let blocks = layout(&output);
        assert_eq!(
            &blocks[1..],
            &[
                Block::Bullet("Q1: First".into()),
                Block::Plain("A1: one".into()),
                Block::Blank,
                Block::Bullet("Q2: Second".into()),
                Block::Plain("A2: whole".into()),
                Block::Bullet("Q2.a: part".into()),
                Block::Plain("A2.a: p".into()),
                Block::Blank,
            ]
        );
    }

    #[test]
    fn test_metadata_block_order_and_presence() {
        let output = OrganizedOutput {
            metadata: Metadata {
                title: Some("Midterm".into()),
                date: Some("2012-07-13".into()),
                author: None,
                course: Some("MATH 110".into()),
                additional_info: Some("Closed book".into()),
            },
            content: vec![],
        };

        assert_eq!(
            layout(&output),
            vec![
                Block::Title("Midterm".into()),
                Block::Metadata(vec![
                    ("Course", "MATH 110".into()),
                    ("Date", "2012-07-13".into()),
                    ("Additional Info", "Closed book".into()),
                ]),
                Block::Blank,
            ]
        );
    }

    #[test]
    fn test_rendered_docx_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let output = OrganizedOutput {
            metadata: Metadata {
                title: Some("Quiz".into()),
                author: Some("Ann".into()),
                ..Default::default()
            },
            content: vec![qa("What is 2+2?", Some("4"), None)],
        };

        save_to_docx(&output, &path).unwrap();
        let text = extractors::docx::extract_text(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines, vec!["Quiz", "Author: Ann", "Q1: What is 2+2?", "A1: 4"]);
    }

    #[test]
    fn test_document_xml_spacing_alignment_and_bullets() {
        let output = OrganizedOutput {
            metadata: Metadata {
                title: Some("Quiz".into()),
                ..Default::default()
            },
            content: vec![qa("What is 2+2?", Some("4"), Some(vec![("Double it?", "8")]))],
        };

        let xml = String::from_utf8(build(&output).build().document).unwrap();
        let paragraphs: Vec<&str> = xml
            .split("</w:p>")
            .filter(|chunk| chunk.contains("<w:pPr>"))
            .collect();
        assert!(!paragraphs.is_empty());

        for p in &paragraphs {
            assert!(p.contains(r#"w:after="160""#), "missing 8pt after: {}", p);
            assert!(p.contains(r#"w:line="360""#), "missing 1.5 line spacing: {}", p);
        }

        let find = |text: &str| {
            paragraphs
                .iter()
                .find(|p| p.contains(text))
                .unwrap_or_else(|| panic!("no paragraph with {:?}", text))
        };

        assert!(find("Quiz").contains(r#"<w:jc w:val="center""#));
        for text in ["Q1: What is 2+2?", "Q1.a: Double it?"] {
            let p = find(text);
            assert!(p.contains("<w:numId"), "{} should be bulleted", text);
            assert!(p.contains(r#"<w:jc w:val="left""#));
        }
        for text in ["A1: 4", "A1.a: 8"] {
            let p = find(text);
            assert!(!p.contains("<w:numId"), "{} should not be bulleted", text);
            assert!(p.contains(r#"<w:jc w:val="left""#));
        }
    }
}
