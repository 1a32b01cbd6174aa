// src/schema/mod.rs
//! The structured Q&A document every stage agrees on.
//!
//! `OrganizedOutput` is produced once by the aligner and then only read by
//! the exporters. Optional fields are skipped on serialization so that an
//! absent value stays absent in the JSON output instead of turning into `null`.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Document-level descriptive fields. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// A single-level nested question/answer pair under a main question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Subquestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionAnswer {
    pub question: String,
    /// May be absent when the subquestions carry the answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subquestions: Option<Vec<Subquestion>>,
}

impl QuestionAnswer {
    /// The main answer, treating an empty string the same as no answer.
    pub fn answer_text(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }

    /// Subquestions in order; empty when there are none.
    pub fn subquestion_list(&self) -> &[Subquestion] {
        self.subquestions.as_deref().unwrap_or(&[])
    }
}

/// Metadata plus the ordered question/answer content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrganizedOutput {
    pub metadata: Metadata,
    pub content: Vec<QuestionAnswer>,
}

impl OrganizedOutput {
    /// The title to name output files after, if the model found a non-blank one.
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Lowercase letter label for the subquestion at zero-based `index`
/// ('a', 'b', ... 'z', 'aa', 'ab', ...).
pub fn subquestion_label(index: usize) -> String {
    let mut n = index + 1;
    let mut label = String::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        label.insert(0, char::from(b'a' + rem));
        n = (n - 1) / 26;
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let output = OrganizedOutput {
            metadata: Metadata {
                title: Some("Quiz".into()),
                ..Default::default()
            },
            content: vec![QuestionAnswer {
                question: "Q".into(),
                answer: None,
                subquestions: None,
            }],
        };

        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"metadata":{"title":"Quiz"},"content":[{"question":"Q"}]}"#);
    }

    #[test]
    fn test_explicit_nulls_deserialize_as_absent() {
        let raw = r#"{"metadata":{"title":null,"date":null,"author":"Ann","course":null,"additional_info":null},
                      "content":[{"question":"Q1","answer":null,"subquestions":null}]}"#;
        let output: OrganizedOutput = serde_json::from_str(raw).unwrap();

        assert_eq!(output.metadata.author.as_deref(), Some("Ann"));
        assert!(output.metadata.title.is_none());
        assert!(output.content[0].answer.is_none());

        let back = serde_json::to_string(&output).unwrap();
        assert!(!back.contains("null"));
    }

    #[test]
    fn test_missing_question_is_rejected() {
        let raw = r#"{"metadata":{},"content":[{"answer":"4"}]}"#;
        assert!(serde_json::from_str::<OrganizedOutput>(raw).is_err());
    }

    #[test]
    fn test_blank_title_is_ignored() {
        let output = OrganizedOutput {
            metadata: Metadata {
                title: Some("   ".into()),
                ..Default::default()
            },
            content: vec![],
        };
        assert_eq!(output.title(), None);
    }

    #[test]
    fn test_empty_answer_counts_as_absent() {
        let qa = QuestionAnswer {
            question: "Q".into(),
            answer: Some(String::new()),
            subquestions: Some(vec![]),
        };
        assert_eq!(qa.answer_text(), None);
        assert!(qa.subquestion_list().is_empty());
    }

    #[test]
    fn test_subquestion_labels() {
        assert_eq!(subquestion_label(0), "a");
        assert_eq!(subquestion_label(1), "b");
        assert_eq!(subquestion_label(25), "z");
        assert_eq!(subquestion_label(26), "aa");
        assert_eq!(subquestion_label(701), "zz");
        assert_eq!(subquestion_label(702), "aaa");
    }
}
