//! Response drafting
//!
//! Intent analysis always runs first; its text is threaded verbatim into
//! whichever of the three draft prompts the selection calls for.

use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::llm::GenerativeModel;
use crate::pipeline::prompts;
use crate::pipeline::selector::Selection;
use crate::types::DraftMode;

/// Secondary articles named in the full-context prompt
pub const MAX_CONTEXT_ARTICLES: usize = 3;

/// A drafted answer and the analysis it was drafted from
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub text: String,
    pub intent: String,
    pub mode: DraftMode,
}

/// Drafts answers with the generative model
pub struct ResponseDrafter {
    model: Arc<dyn GenerativeModel>,
    max_context_articles: usize,
}

impl ResponseDrafter {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            max_context_articles: MAX_CONTEXT_ARTICLES,
        }
    }

    pub fn with_context_limit(model: Arc<dyn GenerativeModel>, max_context_articles: usize) -> Self {
        Self {
            model,
            max_context_articles,
        }
    }

    /// Free-text classification of the question
    pub async fn analyze_intent(&self, query: &str) -> Result<String> {
        let intent = self.model.generate(&prompts::intent_prompt(query)).await?;
        debug!(chars = intent.chars().count(), "intent analysis complete");
        Ok(intent)
    }

    /// Build the draft prompt for a selection
    pub fn draft_prompt(&self, query: &str, intent: &str, selection: &Selection) -> String {
        match (selection.mode, selection.primary.as_ref()) {
            (DraftMode::Hybrid, Some(primary)) => prompts::hybrid_prompt(query, intent, primary),
            (DraftMode::FullContext, Some(primary)) => {
                let limit = self.max_context_articles.min(selection.secondary.len());
                prompts::full_context_prompt(query, intent, primary, &selection.secondary[..limit])
            }
            _ => prompts::knowledge_prompt(query, intent),
        }
    }

    /// Analyze intent, then draft in the selection's mode
    pub async fn draft(&self, query: &str, selection: &Selection) -> Result<Draft> {
        let intent = self.analyze_intent(query).await?;

        let prompt = self.draft_prompt(query, &intent, selection);
        let text = self.model.generate(&prompt).await?;

        info!(
            mode = selection.mode.as_str(),
            model = self.model.model(),
            "draft generated"
        );

        Ok(Draft {
            text,
            intent,
            mode: selection.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChatError;
    use crate::pipeline::selector::RelevanceSelector;
    use crate::types::article::sample_article;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Echoes a fixed reply and records prompts
    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingModel {
        fn new(fail: bool) -> Self {
            Self { prompts: Mutex::new(Vec::new()), fail }
        }
    }

    #[async_trait]
    impl GenerativeModel for RecordingModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(ChatError::model_api("test", "unavailable"));
            }
            let n = self.prompts.lock().unwrap().len();
            Ok(format!("reply {}", n))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "test"
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    #[tokio::test]
    async fn test_intent_runs_before_draft() {
        let model = Arc::new(RecordingModel::new(false));
        let drafter = ResponseDrafter::new(model.clone());
        let selection = RelevanceSelector::new().select(Vec::new());

        let draft = drafter.draft("양자 컴퓨터란?", &selection).await.unwrap();
        assert_eq!(draft.intent, "reply 1");
        assert_eq!(draft.text, "reply 2");
        assert_eq!(draft.mode, DraftMode::NoArticle);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("질문의 의도를 파악"));
        assert!(prompts[1].contains("일반적인 지식을 기반으로"));
        assert!(prompts[1].contains("reply 1"));
    }

    #[test]
    fn test_prompt_per_mode() {
        let drafter = ResponseDrafter::new(Arc::new(RecordingModel::new(false)));
        let selector = RelevanceSelector::new();

        let hybrid = selector.select(vec![sample_article("약한 기사", 0.1)]);
        assert!(drafter.draft_prompt("q", "i", &hybrid).contains("관련성이 다소 낮은"));

        let full = selector.select(vec![sample_article("강한 기사", 9.0)]);
        assert!(drafter.draft_prompt("q", "i", &full).contains("주요 참고 기사"));
    }

    #[test]
    fn test_full_context_limits_secondary_titles() {
        let drafter = ResponseDrafter::new(Arc::new(RecordingModel::new(false)));
        let hits = (0..6)
            .map(|i| sample_article(&format!("기사{}", i), 10.0 - i as f64))
            .collect();
        let selection = RelevanceSelector::new().select(hits);
        let prompt = drafter.draft_prompt("q", "i", &selection);

        assert!(prompt.contains("- 기사1 ("));
        assert!(prompt.contains("- 기사3 ("));
        assert!(!prompt.contains("- 기사4 ("));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let drafter = ResponseDrafter::new(Arc::new(RecordingModel::new(true)));
        let selection = RelevanceSelector::new().select(Vec::new());
        assert!(drafter.draft("질문", &selection).await.is_err());
    }
}
