//! News chatbot: search -> select -> draft -> review
//!
//! Stateless across calls. Each stage awaits the previous one; any drafting or
//! review failure is logged and replaced by the fixed apology result.

use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};

use crate::cli::config::{Config, PipelineConfig};
use crate::errors::Result;
use crate::llm::GenerativeModel;
use crate::pipeline::drafter::ResponseDrafter;
use crate::pipeline::reviewer::ResponseReviewer;
use crate::pipeline::selector::RelevanceSelector;
use crate::search::ArticleSearch;
use crate::types::PipelineResult;

/// Default number of hits requested from the search layer
pub const DEFAULT_SEARCH_LIMIT: usize = 7;

/// End-to-end query pipeline
pub struct NewsChatbot {
    search: Arc<dyn ArticleSearch>,
    selector: RelevanceSelector,
    drafter: ResponseDrafter,
    reviewer: ResponseReviewer,
    search_limit: usize,
}

impl NewsChatbot {
    /// Create with default pipeline constants
    pub fn new(search: Arc<dyn ArticleSearch>, model: Arc<dyn GenerativeModel>) -> Self {
        Self::with_config(search, model, &PipelineConfig::default(), DEFAULT_SEARCH_LIMIT)
    }

    /// Create with custom pipeline configuration
    pub fn with_config(
        search: Arc<dyn ArticleSearch>,
        model: Arc<dyn GenerativeModel>,
        config: &PipelineConfig,
        search_limit: usize,
    ) -> Self {
        Self {
            search,
            selector: RelevanceSelector::with_config(config),
            drafter: ResponseDrafter::with_context_limit(model.clone(), config.max_context_articles),
            reviewer: ResponseReviewer::with_excerpt_chars(model, config.review_excerpt_chars),
            search_limit,
        }
    }

    /// Build from a full application configuration
    pub fn from_config(
        config: &Config,
        search: Arc<dyn ArticleSearch>,
        model: Arc<dyn GenerativeModel>,
    ) -> Self {
        Self::with_config(search, model, &config.pipeline, config.search.default_limit)
    }

    /// Answer a query. Never fails: errors become the apology result.
    pub async fn process_query(&self, query: &str) -> PipelineResult {
        let span = info_span!("process_query", query = %query);

        match self.run(query).instrument(span).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "query processing failed");
                PipelineResult::apology()
            }
        }
    }

    async fn run(&self, query: &str) -> Result<PipelineResult> {
        let articles = self.search.search(query, self.search_limit).await;
        info!(hits = articles.len(), "articles retrieved");

        let selection = self.selector.select(articles);
        info!(
            mode = selection.mode.as_str(),
            score = selection.relevance_score(),
            "relevance selected"
        );

        let draft = self.drafter.draft(query, &selection).await?;
        let answer = self
            .reviewer
            .finalize(query, &draft, selection.primary.as_ref())
            .await?;

        let relevance_score = selection.relevance_score();
        Ok(PipelineResult {
            primary: selection.primary,
            secondary: selection.secondary,
            relevance_score,
            answer,
            mode: Some(draft.mode),
        })
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChatError;
    use crate::types::article::sample_article;
    use crate::types::{Article, DraftMode, APOLOGY_ANSWER};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticSearch(Vec<Article>);

    #[async_trait]
    impl ArticleSearch for StaticSearch {
        async fn search(&self, _query: &str, limit: usize) -> Vec<Article> {
            self.0.iter().take(limit).cloned().collect()
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    /// Fails on the n-th call (1-based), otherwise replies "step n"
    struct FailingAt {
        fail_on: usize,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl GenerativeModel for FailingAt {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == self.fail_on {
                return Err(ChatError::model_api("test", "connection reset"));
            }
            Ok(format!("step {}", *calls))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "test"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    fn chatbot(hits: Vec<Article>, fail_on: usize) -> NewsChatbot {
        NewsChatbot::new(
            Arc::new(StaticSearch(hits)),
            Arc::new(FailingAt { fail_on, calls: Mutex::new(0) }),
        )
    }

    #[tokio::test]
    async fn test_revised_answer_returned() {
        let bot = chatbot(vec![sample_article("AI", 12.4)], 0);
        let result = bot.process_query("AI 기술 동향").await;

        // step 1 = intent, step 2 = draft, step 3 = review replacement
        assert_eq!(result.answer, "step 3");
        assert_eq!(result.mode, Some(DraftMode::FullContext));
        assert_eq!(result.relevance_score, 12.4);
    }

    #[tokio::test]
    async fn test_failure_at_each_stage_yields_apology() {
        for stage in 1..=3 {
            let bot = chatbot(vec![sample_article("AI", 12.4)], stage);
            let result = bot.process_query("AI 기술 동향").await;

            assert!(result.is_apology(), "stage {} should fail", stage);
            assert_eq!(result.answer, APOLOGY_ANSWER);
            assert!(result.primary.is_none());
            assert!(result.secondary.is_empty());
        }
    }

    #[test]
    fn test_from_config_uses_search_limit() {
        let mut config = Config::default();
        config.search.default_limit = 3;
        let bot = NewsChatbot::from_config(
            &config,
            Arc::new(StaticSearch(Vec::new())),
            Arc::new(FailingAt { fail_on: 0, calls: Mutex::new(0) }),
        );
        assert_eq!(bot.search_limit(), 3);
    }
}
