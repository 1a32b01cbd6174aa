// src/alignment/mod.rs
//! Pairs extracted question text with extracted answer text through a single
//! structured-output model call, validating the reply into `OrganizedOutput`.
pub mod client;
pub mod models;
pub mod prompt;

use crate::schema::OrganizedOutput;
use crate::utils::error::AlignError;
use client::ChatBackend;
use models::{ChatRequest, ChatResponse, Message, ResponseFormat};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 3000;

pub struct Aligner {
    backend: Box<dyn ChatBackend>,
    max_tokens: u32,
}

impl Aligner {
    pub fn new(backend: Box<dyn ChatBackend>, max_tokens: u32) -> Self {
        Self { backend, max_tokens }
    }

    /// Builds the alignment request for the given texts.
    pub fn build_request(&self, questions_text: &str, answers_text: &str, model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                Message::system(prompt::SYSTEM_PROMPT),
                Message::user(prompt::build_prompt(questions_text, answers_text)),
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat::strict_for::<OrganizedOutput>("organized_output"),
        }
    }

    /// Makes exactly one model call and validates the reply.
    pub async fn align(
        &self,
        questions_text: &str,
        answers_text: &str,
        model: &str,
    ) -> Result<OrganizedOutput, AlignError> {
        let request = self.build_request(questions_text, answers_text, model);
        tracing::debug!(
            "Alignment prompt is {} chars",
            request.messages.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let response = self.backend.complete(&request).await?;
        let output = parse_response(response)?;

        tracing::info!(
            "Aligned {} question(s){}",
            output.content.len(),
            output
                .title()
                .map(|t| format!(" for '{}'", t))
                .unwrap_or_default()
        );
        Ok(output)
    }
}

/// Validates the first choice of a chat response into `OrganizedOutput`.
/// A reply that does not fit the schema is logged verbatim before failing.
pub fn parse_response(response: ChatResponse) -> Result<OrganizedOutput, AlignError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(AlignError::EmptyResponse)?;

    if let Some(refusal) = choice.message.refusal {
        tracing::error!("Model refused alignment request: {}", refusal);
        return Err(AlignError::Refusal(refusal));
    }

    if choice.finish_reason.as_deref() == Some("length") {
        tracing::warn!("Model response hit the max token limit and is likely truncated");
    }

    let raw = choice.message.content.ok_or(AlignError::EmptyResponse)?;

    serde_json::from_str::<OrganizedOutput>(&raw).map_err(|e| {
        tracing::error!(raw_response = %raw, "Model response failed schema validation: {}", e);
        AlignError::ResponseParse(e.to_string())
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Returns a canned message and records every request it receives.
    pub(crate) struct StubBackend {
        content: String,
        pub(crate) requests: Mutex<Vec<ChatRequest>>,
    }

    impl StubBackend {
        pub(crate) fn new(content: &str) -> Self {
            Self {
                content: content.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for StubBackend {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AlignError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(response_with(serde_json::json!({ "content": self.content })))
        }
    }

    #[async_trait]
    impl ChatBackend for Arc<StubBackend> {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AlignError> {
            self.as_ref().complete(request).await
        }
    }

    pub(crate) fn response_with(message: serde_json::Value) -> ChatResponse {
        serde_json::from_value(serde_json::json!({
            "choices": [{ "message": message, "finish_reason": "stop" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_align_sends_deterministic_schema_request() {
        let backend = StubBackend::new(
            r#"{"metadata":{},"content":[{"question":"What is 2+2?","answer":"4"}]}"#,
        );
        let backend = Arc::new(backend);
        let aligner = Aligner::new(Box::new(backend.clone()), 3000);
        let output = tokio_test::block_on(aligner.align("1. What is 2+2?", "1. 4", "gpt-4o")).unwrap();

        assert_eq!(output.content.len(), 1);
        assert_eq!(output.content[0].answer.as_deref(), Some("4"));

        let sent = backend.requests.lock().unwrap();
        assert_eq!(sent.len(), 1, "alignment must be a single attempt");
        assert_eq!(sent[0].model, "gpt-4o");
        assert_eq!(sent[0].temperature, 0.0);
        assert_eq!(sent[0].max_tokens, 3000);
        assert!(sent[0].response_format.json_schema.strict);
        assert!(sent[0].messages[1].content.contains("1. What is 2+2?"));
        assert!(sent[0].messages[1].content.contains("1. 4"));
    }

    #[test]
    fn test_malformed_response_is_parse_error() {
        let aligner = Aligner::new(Box::new(StubBackend::new("```json\n{}\n```")), 3000);
        let err = tokio_test::block_on(aligner.align("q", "a", "gpt-4o")).unwrap_err();
        assert!(matches!(err, AlignError::ResponseParse(_)));
    }

    #[test]
    fn test_schema_mismatch_is_parse_error() {
        let response = response_with(serde_json::json!({
            "content": r#"{"metadata":{},"content":[{"answer":"no question"}]}"#
        }));
        assert!(matches!(parse_response(response), Err(AlignError::ResponseParse(_))));
    }

    #[test]
    fn test_refusal_and_empty_responses() {
        let refused = response_with(serde_json::json!({ "content": null, "refusal": "no" }));
        assert!(matches!(parse_response(refused), Err(AlignError::Refusal(_))));

        let empty = response_with(serde_json::json!({ "content": null }));
        assert!(matches!(parse_response(empty), Err(AlignError::EmptyResponse)));

        let no_choices: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parse_response(no_choices), Err(AlignError::EmptyResponse)));
    }

    #[test]
    fn test_subquestions_without_main_answer_are_valid() {
        let response = response_with(serde_json::json!({
            "content": r#"{"metadata":{"title":"Midterm","date":null},
                           "content":[{"question":"Consider f.","answer":null,
                                       "subquestions":[{"question":"f(0)?","answer":"1"},
                                                       {"question":"f(1)?","answer":"2"}]}]}"#
        }));
        let output = parse_response(response).unwrap();

        assert_eq!(output.title(), Some("Midterm"));
        assert!(output.content[0].answer.is_none());
        assert_eq!(output.content[0].subquestion_list().len(), 2);
    }
}
