//! Chat session state for the REPL
//!
//! Owned by the caller, never by the pipeline. Tracks the conversation, the
//! de-duplicated search history and every primary article shown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Article, DraftMode, PipelineResult};

/// One question and its answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub query: String,
    pub answer: String,
    /// Primary followed by secondaries; empty when nothing was found
    pub articles: Vec<Article>,
    pub mode: Option<DraftMode>,
    pub timestamp: DateTime<Utc>,
}

/// Conversation state for one REPL run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    turns: Vec<ChatTurn>,
    search_history: Vec<String>,
    article_history: Vec<Article>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: Vec::new(),
            search_history: Vec::new(),
            article_history: Vec::new(),
        }
    }

    /// Record a query and the pipeline's answer to it
    pub fn record(&mut self, query: &str, result: &PipelineResult) {
        self.add_search(query);

        self.turns.push(ChatTurn {
            query: query.to_string(),
            answer: result.answer.clone(),
            articles: result.cited_articles().into_iter().cloned().collect(),
            mode: result.mode,
            timestamp: Utc::now(),
        });

        if let Some(primary) = &result.primary {
            self.article_history.push(primary.clone());
        }
    }

    /// Add to search history, keeping first-seen order
    pub fn add_search(&mut self, query: &str) {
        if !self.search_history.iter().any(|q| q == query) {
            self.search_history.push(query.to_string());
        }
    }

    /// Clear the conversation. Search history survives.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.article_history.clear();
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Most recent turns, newest first
    pub fn recent_turns(&self, limit: usize) -> Vec<&ChatTurn> {
        self.turns.iter().rev().take(limit).collect()
    }

    pub fn search_history(&self) -> &[String] {
        &self.search_history
    }

    /// Last `n` distinct searches, newest first
    pub fn recent_searches(&self, n: usize) -> Vec<&str> {
        self.search_history
            .iter()
            .rev()
            .take(n)
            .map(String::as_str)
            .collect()
    }

    pub fn article_history(&self) -> &[Article] {
        &self.article_history
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Seconds since the session started
    pub fn duration_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
