//! Draft review
//!
//! The model either answers with the acceptance marker, keeping the draft, or
//! returns a complete replacement. There are no partial edits.

use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::llm::GenerativeModel;
use crate::pipeline::drafter::Draft;
use crate::pipeline::prompts::{self, ACCEPT_MARKER};
use crate::types::Article;

/// Primary content excerpt length in the review prompt
pub const REVIEW_EXCERPT_CHARS: usize = 300;

/// What the reviewer decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewVerdict {
    Accepted,
    Revised(String),
}

impl ReviewVerdict {
    /// Interpret the reviewer's raw completion
    pub fn parse(completion: &str) -> Self {
        if completion.contains(ACCEPT_MARKER) {
            ReviewVerdict::Accepted
        } else {
            ReviewVerdict::Revised(completion.to_string())
        }
    }

    /// Final answer given the reviewed draft
    pub fn resolve(self, draft: &str) -> String {
        match self {
            ReviewVerdict::Accepted => draft.to_string(),
            ReviewVerdict::Revised(text) => text,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ReviewVerdict::Accepted)
    }
}

/// Critiques drafts with the generative model
pub struct ResponseReviewer {
    model: Arc<dyn GenerativeModel>,
    excerpt_chars: usize,
}

impl ResponseReviewer {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            excerpt_chars: REVIEW_EXCERPT_CHARS,
        }
    }

    pub fn with_excerpt_chars(model: Arc<dyn GenerativeModel>, excerpt_chars: usize) -> Self {
        Self {
            model,
            excerpt_chars,
        }
    }

    /// Review prompt: article-backed when a primary exists, general otherwise
    pub fn review_prompt(&self, query: &str, draft: &Draft, primary: Option<&Article>) -> String {
        match primary {
            Some(article) => prompts::article_review_prompt(
                query,
                &draft.text,
                &draft.intent,
                article,
                self.excerpt_chars,
            ),
            None => prompts::general_review_prompt(query, &draft.text, &draft.intent),
        }
    }

    /// Ask the model to accept or replace the draft
    pub async fn review(
        &self,
        query: &str,
        draft: &Draft,
        primary: Option<&Article>,
    ) -> Result<ReviewVerdict> {
        let prompt = self.review_prompt(query, draft, primary);
        let completion = self.model.generate(&prompt).await?;
        let verdict = ReviewVerdict::parse(&completion);

        info!(accepted = verdict.is_accepted(), "draft reviewed");
        Ok(verdict)
    }

    /// Review and return the final answer text
    pub async fn finalize(&self, query: &str, draft: &Draft, primary: Option<&Article>) -> Result<String> {
        let verdict = self.review(query, draft, primary).await?;
        Ok(verdict.resolve(&draft.text))
    }
}
