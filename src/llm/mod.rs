//! Generative model providers
//!
//! One prompt in, one completion out. The pipeline never parses completions
//! structurally, so providers return the raw text.

pub mod gemini;
pub mod ollama;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::config::Config;
use crate::errors::{ChatError, Result};

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

/// Text-completion model
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Complete a single prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is reachable and usable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier
    fn model(&self) -> &str;
}

/// Build the configured provider
pub fn from_config(config: &Config) -> Result<Arc<dyn GenerativeModel>> {
    let timeout = config.model.timeout_secs.map(Duration::from_secs);

    match config.model.provider.as_str() {
        "gemini" => {
            let api_key = std::env::var(&config.model.api_key_env).map_err(|_| {
                ChatError::ConfigError(format!(
                    "{} is not set",
                    config.model.api_key_env
                ))
            })?;
            Ok(Arc::new(GeminiClient::new(
                api_key,
                &config.model.gemini_model,
                timeout,
            )?))
        }
        "ollama" => Ok(Arc::new(OllamaClient::with_config(
            &config.ollama_url(),
            &config.model.ollama_model,
            timeout,
        )?)),
        other => Err(ChatError::ConfigError(format!(
            "Unknown model provider: {}",
            other
        ))),
    }
}
