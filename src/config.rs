// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::AppError;

/// Environment variables checked, in order, for the model API credential.
pub const API_KEY_VARS: [&str; 2] = ["OPENAI_KEY", "OPENAI_API_KEY"];

/// Everything a job needs, resolved once at startup and handed to the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub output_dir: PathBuf,
    pub tesseract_bin: String,
    pub ocr_lang: String,
}

/// Returns the first non-empty credential from `lookup`, or a configuration
/// error naming the variables that were checked.
pub fn resolve_api_key<F>(lookup: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| {
            AppError::Config(format!(
                "model API key not set; export {} (or add it to .env)",
                API_KEY_VARS.join(" or ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        let err = resolve_api_key(|_| None).unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("OPENAI_KEY")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_primary_variable_wins() {
        let key = resolve_api_key(|var| match var {
            "OPENAI_KEY" => Some("sk-primary".to_string()),
            "OPENAI_API_KEY" => Some("sk-fallback".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(key, "sk-primary");
    }

    #[test]
    fn test_blank_primary_falls_back() {
        let key = resolve_api_key(|var| match var {
            "OPENAI_KEY" => Some("  ".to_string()),
            "OPENAI_API_KEY" => Some("sk-fallback".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(key, "sk-fallback");
    }
}
