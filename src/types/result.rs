//! Pipeline output types shared by the chatbot and its callers

use serde::{Deserialize, Serialize};

use crate::types::article::Article;

/// Fixed answer returned when any drafting or review stage fails
pub const APOLOGY_ANSWER: &str = "처리 중 오류가 발생했습니다.";

/// Drafting mode, chosen once per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftMode {
    /// No search hits: answer from general knowledge only
    NoArticle,
    /// Best hit scored below the low-relevance threshold
    Hybrid,
    /// Best hit is relevant enough to anchor the answer
    FullContext,
}

impl DraftMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftMode::NoArticle => "no_article",
            DraftMode::Hybrid => "hybrid",
            DraftMode::FullContext => "full_context",
        }
    }
}

/// Everything the presentation layer receives for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Highest-scoring article, if any
    pub primary: Option<Article>,
    /// Remaining ranked hits (never includes the primary)
    pub secondary: Vec<Article>,
    /// Raw engine score of the primary, 0.0 without one
    pub relevance_score: f64,
    /// Final, reviewed answer text
    pub answer: String,
    /// Mode used to draft; `None` only for the apology result
    pub mode: Option<DraftMode>,
}

impl PipelineResult {
    /// The fixed result for a failed query
    pub fn apology() -> Self {
        Self {
            primary: None,
            secondary: Vec::new(),
            relevance_score: 0.0,
            answer: APOLOGY_ANSWER.to_string(),
            mode: None,
        }
    }

    pub fn is_apology(&self) -> bool {
        self.mode.is_none() && self.answer == APOLOGY_ANSWER
    }

    /// Primary followed by secondaries, in ranked order
    pub fn cited_articles(&self) -> Vec<&Article> {
        self.primary.iter().chain(self.secondary.iter()).collect()
    }
}
