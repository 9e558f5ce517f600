//! Configuration management for NewsBuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.newsbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::errors::{ChatError, Result};
use crate::pipeline::chatbot::DEFAULT_SEARCH_LIMIT;
use crate::pipeline::drafter::MAX_CONTEXT_ARTICLES;
use crate::pipeline::reviewer::REVIEW_EXCERPT_CHARS;
use crate::pipeline::selector::{LOW_RELEVANCE_THRESHOLD, MAX_SECONDARY_ARTICLES};

/// Complete configuration for NewsBuddy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
    pub display: DisplayConfig,
    pub paths: PathsConfig,
}

/// Elasticsearch connection and query shaping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub url: String,
    pub index: String,
    pub default_limit: usize,
    /// Allowed term reordering for the phrase clause
    pub phrase_slop: u32,
    pub phrase_boost: f64,
    pub content_fragment_size: usize,
    pub content_fragments: usize,
    /// Preview length when a hit carries no content highlight
    pub preview_chars: usize,
}

/// Which generative model to call and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// `gemini` or `ollama`
    pub provider: String,
    pub gemini_model: String,
    /// Environment variable holding the Gemini API key
    pub api_key_env: String,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub ollama_model: String,
    /// Request timeout; no timeout when absent
    pub timeout_secs: Option<u64>,
}

/// Relevance gating constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Primary scores below this draft in hybrid mode
    pub low_relevance_threshold: f64,
    pub max_secondary_articles: usize,
    /// Secondary articles named in the full-context prompt
    pub max_context_articles: usize,
    /// Primary content excerpt length in the review prompt
    pub review_excerpt_chars: usize,
}

/// Terminal presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Article card is shown only above this score
    pub min_article_score: f64,
    pub max_related_shown: usize,
}

/// File system paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
    pub history_file: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "news_articles".to_string(),
            default_limit: DEFAULT_SEARCH_LIMIT,
            phrase_slop: 2,
            phrase_boost: 5.0,
            content_fragment_size: 150,
            content_fragments: 3,
            preview_chars: 300,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            gemini_model: "gemini-2.0-flash-exp".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            ollama_host: "127.0.0.1".to_string(),
            ollama_port: 11434,
            ollama_model: "qwen2.5:7b-instruct".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            low_relevance_threshold: LOW_RELEVANCE_THRESHOLD,
            max_secondary_articles: MAX_SECONDARY_ARTICLES,
            max_context_articles: MAX_CONTEXT_ARTICLES,
            review_excerpt_chars: REVIEW_EXCERPT_CHARS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_article_score: 0.2,
            max_related_shown: 5,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.newsbuddy".to_string(),
            history_file: "~/.newsbuddy/history".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ChatError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".newsbuddy").join("config.toml");
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.index.trim().is_empty() {
            return Err(ChatError::ConfigError(
                "search.index must not be empty".to_string()
            ));
        }

        if self.search.default_limit == 0 {
            return Err(ChatError::ConfigError(
                "search.default_limit must be greater than 0".to_string()
            ));
        }

        if self.pipeline.low_relevance_threshold < 0.0 {
            return Err(ChatError::ConfigError(
                "pipeline.low_relevance_threshold must not be negative".to_string()
            ));
        }

        if self.pipeline.max_secondary_articles == 0 {
            return Err(ChatError::ConfigError(
                "pipeline.max_secondary_articles must be greater than 0".to_string()
            ));
        }

        if self.display.min_article_score < 0.0 {
            return Err(ChatError::ConfigError(
                "display.min_article_score must not be negative".to_string()
            ));
        }

        match self.model.provider.as_str() {
            "gemini" | "ollama" => {}
            other => return Err(ChatError::ConfigError(
                format!("Unknown model provider: {}", other)
            )),
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ChatError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ChatError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ChatError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.model.ollama_host, self.model.ollama_port)
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }

    /// Get REPL history file path
    pub fn history_file(&self) -> PathBuf {
        Self::expand_path(&self.paths.history_file)
    }
}
