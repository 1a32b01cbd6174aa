// src/pipeline.rs
//! Extract both documents, align them with one model call, then write the
//! JSON/DOCX pair named after the document title.
use std::path::Path;

use crate::alignment::client::OpenAiClient;
use crate::alignment::Aligner;
use crate::config::PipelineConfig;
use crate::exporters;
use crate::extractors::image::OcrEngine;
use crate::extractors::TextExtractor;
use crate::schema::OrganizedOutput;
use crate::storage::{OutputPair, StorageManager, DEFAULT_TITLE};
use crate::utils::AppError;

#[derive(Debug)]
pub struct JobOutcome {
    pub title: String,
    pub files: OutputPair,
    pub output: OrganizedOutput,
}

pub struct Pipeline {
    extractor: TextExtractor,
    aligner: Aligner,
    storage: StorageManager,
    model: String,
}

impl Pipeline {
    pub fn new(extractor: TextExtractor, aligner: Aligner, storage: StorageManager, model: impl Into<String>) -> Self {
        Self {
            extractor,
            aligner,
            storage,
            model: model.into(),
        }
    }

    /// Wires the production pipeline: tesseract OCR, the HTTP model client and
    /// the configured output directory.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, AppError> {
        let client = OpenAiClient::new(&config.api_key, &config.base_url, config.request_timeout)?;

        Ok(Self::new(
            TextExtractor::new(OcrEngine::new(&config.tesseract_bin, &config.ocr_lang)),
            Aligner::new(Box::new(client), config.max_tokens),
            StorageManager::new(&config.output_dir)?,
            &config.model,
        ))
    }

    /// Runs one job end to end. Any failure aborts the job before output is written.
    pub async fn run(&self, questions: &Path, answers: &Path) -> Result<JobOutcome, AppError> {
        tracing::info!("Processing questions {} and answers {}", questions.display(), answers.display());

        let questions_text = self.extractor.extract(questions)?;
        let answers_text = self.extractor.extract(answers)?;

        let output = self.aligner.align(&questions_text, &answers_text, &self.model).await?;

        let title = output.title().unwrap_or(DEFAULT_TITLE).to_string();
        let json = exporters::json::to_json_string(&output)?;
        let docx = exporters::docx::render(&output)?;
        let files = self.storage.save_pair(&title, json.as_bytes(), &docx)?;

        Ok(JobOutcome { title, files, output })
    }
}
