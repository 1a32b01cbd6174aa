// src/main.rs
mod alignment;
mod config;
mod exporters;
mod extractors;
mod pipeline;
mod schema;
mod storage;
mod utils;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use config::PipelineConfig;
use exporters::ExportFormat;
use pipeline::Pipeline;
use storage::StorageManager;
use utils::AppError;

/// Align scanned or digital question and answer documents into structured Q&A
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, align and export a question document and its answer document
    Process(ProcessArgs),

    /// Look up the JSON and DOCX written for a document title
    Locate {
        /// Document title (as found in the aligned metadata)
        #[arg(short, long)]
        title: String,

        /// Directory holding exported files
        #[arg(short, long, default_value = "./outputs")]
        output_dir: PathBuf,
    },

    /// Re-export a previously written JSON file in another format
    Export {
        /// Aligned JSON file to read
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: ExportFormat,

        /// Destination path (defaults to the input path with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Question document (.pdf, .docx, .png, .jpg, .jpeg)
    #[arg(short, long)]
    questions: PathBuf,

    /// Answer document (.pdf, .docx, .png, .jpg, .jpeg)
    #[arg(short, long)]
    answers: PathBuf,

    /// Output directory for the exported files
    #[arg(short, long, default_value = "./outputs")]
    output_dir: PathBuf,

    /// Model used for alignment
    #[arg(short, long, default_value = alignment::DEFAULT_MODEL)]
    model: String,

    /// Maximum response tokens for the alignment call
    #[arg(long, default_value_t = alignment::DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Timeout for the alignment request in seconds (the call is never retried)
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = alignment::client::DEFAULT_BASE_URL)]
    base_url: String,

    /// Tesseract binary used for image OCR
    #[arg(long, default_value = "tesseract")]
    tesseract: String,

    /// Tesseract language code
    #[arg(long, default_value = "eng")]
    ocr_lang: String,
}

impl ProcessArgs {
    fn into_config(self, api_key: String) -> PipelineConfig {
        PipelineConfig {
            api_key,
            base_url: self.base_url,
            model: self.model,
            max_tokens: self.max_tokens,
            request_timeout: Duration::from_secs(self.timeout_secs),
            output_dir: self.output_dir,
            tesseract_bin: self.tesseract,
            ocr_lang: self.ocr_lang,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load .env (if any) and set up logging (reads RUST_LOG env var)
    let dotenv = dotenvy::dotenv();
    utils::logging::setup_logging();
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // 2. Parse CLI Arguments
    let cli = Cli::parse();
    tracing::info!("Starting with args: {:?}", cli.command);

    match cli.command {
        Command::Process(args) => {
            // 3. Fail fast on a missing credential before any extraction work
            let api_key = config::resolve_api_key(|var| std::env::var(var).ok())?;
            let (questions, answers) = (args.questions.clone(), args.answers.clone());
            let config = args.into_config(api_key);

            // 4. Extract -> align -> export
            let pipeline = Pipeline::from_config(&config)?;
            let outcome = pipeline.run(&questions, &answers).await?;

            tracing::info!(
                "Processing finished for '{}': {} question(s)",
                outcome.title,
                outcome.output.content.len()
            );
            println!("{}", outcome.files.json.display());
            println!("{}", outcome.files.docx.display());
        }
        Command::Locate { title, output_dir } => {
            let storage = StorageManager::new(&output_dir)?;
            let files = storage.locate(&title)?;
            println!("{}", files.json.display());
            println!("{}", files.docx.display());
        }
        Command::Export { input, format, output } => {
            let document = exporters::json::load_from_json(&input)?;
            let path = output.unwrap_or_else(|| exporters::default_path(&input, format));
            exporters::export(&document, format, &path)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
