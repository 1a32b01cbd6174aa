// src/exporters/latex.rs
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::OrganizedOutput;
use crate::utils::error::ExportError;

pub const MAX_LINE_CHARS: usize = 80;

// Display (`$$...$$`) then inline (`$...$`) math spans; everything outside them is escaped.
static MATH_SPAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\$\$.*?\$\$|\$[^$]*\$").expect("Failed to compile MATH_SPAN_RE")
});

const PREAMBLE: &str = r"\documentclass[14pt]{exam}
\usepackage{mathtools}
\usepackage{amsmath}
\usepackage{amsthm}
\usepackage{amssymb}
\usepackage{graphicx}
\usepackage{mathrsfs}
\usepackage{upgreek}
\usepackage{extsizes}
\usepackage[margin=0.75in]{geometry}
\usepackage{fancyhdr}

\begin{document}
";

/// Breaks `text` into lines of `max_chars` characters, never inside `$...$`
/// or `$$...$$` math (a line runs past the limit until its math span closes).
/// Lines are trimmed; empty ones dropped.
pub fn wrap_outside_math(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut inside_math = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        current_len += 1;
        if ch == '$' {
            // `$$` opens or closes display math as one delimiter
            if chars.peek() == Some(&'$') {
                chars.next();
                current.push('$');
                current_len += 1;
            }
            inside_math = !inside_math;
        }
        if !inside_math && current_len >= max_chars {
            let line = current.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
            current.clear();
            current_len = 0;
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }
    lines
}

/// Escapes LaTeX special characters outside math spans.
pub fn escape_outside_math(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in MATH_SPAN_RE.find_iter(text) {
        out.push_str(&escape_latex(&text[last..m.start()]));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&escape_latex(&text[last..]));
    out
}

fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_answer(tex: &mut String, answer: &str) {
    let lines = wrap_outside_math(answer, MAX_LINE_CHARS);
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        let line = escape_outside_math(line);
        if i == 0 {
            let _ = write!(tex, "\\centerline{{\\textbf{{Answer:}} {}}}", line);
        } else {
            let _ = write!(tex, "\\centerline{{{}}}", line);
        }
        tex.push_str(if i < last { "\\\\\n" } else { "\\bigskip\n" });
    }
}

/// Renders a complete exam-class document stamped with `generated_at`.
pub fn render(output: &OrganizedOutput, generated_at: DateTime<Utc>) -> String {
    let metadata = &output.metadata;
    let title = output.title().unwrap_or("Untitled Document");
    let author = metadata.author.as_deref().unwrap_or("Unknown Author");
    let course = metadata.course.as_deref().unwrap_or("Unknown Course");
    let date = metadata.date.as_deref().unwrap_or("Unknown Date");

    let mut tex = String::new();
    let _ = writeln!(tex, "% Generated {}", generated_at.to_rfc3339());
    tex.push_str(PREAMBLE);

    let _ = writeln!(tex, "\\chead{{\\emph{{{}}}}}", escape_outside_math(author));
    let _ = writeln!(tex, "\\centerline{{\\bf\\Large {}}}", escape_outside_math(title));
    let _ = writeln!(
        tex,
        "\\centerline{{\\emph{{\\large {}, {}}}}}",
        escape_outside_math(course),
        escape_outside_math(date)
    );
    if let Some(info) = metadata.additional_info.as_deref().filter(|i| !i.is_empty()) {
        let _ = writeln!(tex, "\\centerline{{Additional Info: {}}}", escape_outside_math(info));
    }
    tex.push_str("\n\\bigskip\n\n");

    for (idx, qa) in output.content.iter().enumerate() {
        let _ = writeln!(
            tex,
            "\\noindent\\textbf{{{}.}} {}\\\\",
            idx + 1,
            escape_outside_math(&qa.question)
        );

        if let Some(answer) = qa.answer_text() {
            write_answer(&mut tex, answer);
        }

        for sub in qa.subquestion_list() {
            let _ = writeln!(tex, "{}\\\\", escape_outside_math(&sub.question));
            if !sub.answer.is_empty() {
                write_answer(&mut tex, &sub.answer);
            }
            tex.push_str("\n\\bigskip\n\n");
        }
        tex.push('\n');
    }

    tex.push_str("\\end{document}\n");
    tex
}

pub fn save_to_latex(output: &OrganizedOutput, path: &Path) -> Result<(), ExportError> {
    fs::write(path, render(output, Utc::now()))?;
    tracing::info!("Saved LaTeX to {}", path.display());
    Ok(())
}
