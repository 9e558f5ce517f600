//! Error types for NewsBuddy
//!
//! Search-layer failures are normally absorbed by the search client itself;
//! everything else propagates as a `ChatError` up to the chatbot boundary.

use thiserror::Error;

/// Main error type for the news chatbot
#[derive(Error, Debug)]
pub enum ChatError {
    /// Search index errors (Elasticsearch)
    #[error("Search index error: {0}")]
    SearchError(String),

    /// Index maintenance errors (schema creation, bulk sync)
    #[error("Index sync error: {0}")]
    IndexError(String),

    /// Generative model API errors (Gemini, Ollama)
    #[error("Model API error ({provider}): {message}")]
    ModelApiError { provider: String, message: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("Chatbot error: {0}")]
    Generic(String),
}

impl ChatError {
    /// Shorthand for a model API failure
    pub fn model_api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ChatError::ModelApiError {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for chatbot operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Convert anyhow errors to ChatError
impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::Generic(err.to_string())
    }
}
