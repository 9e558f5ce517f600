//! Relevance selection and drafting-mode routing
//!
//! The engine's own score is the only gating signal: the best hit becomes the
//! primary article, the next few become secondary context.

use serde::{Deserialize, Serialize};

use crate::cli::config::PipelineConfig;
use crate::types::{Article, DraftMode};

/// Primary scores below this route to hybrid drafting
pub const LOW_RELEVANCE_THRESHOLD: f64 = 0.3;

/// Secondary articles kept per query
pub const MAX_SECONDARY_ARTICLES: usize = 8;

/// Outcome of selecting among search hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub primary: Option<Article>,
    pub secondary: Vec<Article>,
    pub mode: DraftMode,
}

impl Selection {
    /// Raw engine score of the primary, 0.0 without one
    pub fn relevance_score(&self) -> f64 {
        self.primary.as_ref().map(|a| a.score).unwrap_or(0.0)
    }

    pub fn has_articles(&self) -> bool {
        self.primary.is_some()
    }
}

/// Picks the primary article and drafting mode
#[derive(Debug, Clone)]
pub struct RelevanceSelector {
    low_relevance_threshold: f64,
    max_secondary: usize,
}

impl RelevanceSelector {
    pub fn new() -> Self {
        Self {
            low_relevance_threshold: LOW_RELEVANCE_THRESHOLD,
            max_secondary: MAX_SECONDARY_ARTICLES,
        }
    }

    pub fn with_config(config: &PipelineConfig) -> Self {
        Self {
            low_relevance_threshold: config.low_relevance_threshold,
            max_secondary: config.max_secondary_articles,
        }
    }

    /// Mode as a function of emptiness and the primary's score
    pub fn mode_for(&self, primary: Option<&Article>) -> DraftMode {
        match primary {
            None => DraftMode::NoArticle,
            Some(article) if article.score < self.low_relevance_threshold => DraftMode::Hybrid,
            Some(_) => DraftMode::FullContext,
        }
    }

    /// Split hits into primary and secondary. Ties keep the incoming order.
    pub fn select(&self, mut articles: Vec<Article>) -> Selection {
        articles.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut ranked = articles.into_iter();
        let primary = ranked.next();
        let secondary: Vec<Article> = ranked.take(self.max_secondary).collect();
        let mode = self.mode_for(primary.as_ref());

        Selection {
            primary,
            secondary,
            mode,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.low_relevance_threshold
    }
}

impl Default for RelevanceSelector {
    fn default() -> Self {
        Self::new()
    }
}
