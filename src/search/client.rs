//! Elasticsearch search client
//!
//! Search failures never reach the caller: any transport, status, or decoding
//! error is logged and turned into an empty result list.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::config::SearchConfig;
use crate::errors::{ChatError, Result};
use crate::search::query::{parse_response, SearchQueryBuilder};
use crate::types::Article;

/// Ranked full-text search over the article corpus
#[async_trait]
pub trait ArticleSearch: Send + Sync {
    /// At most `limit` articles, highest score first. Empty on any failure.
    async fn search(&self, query: &str, limit: usize) -> Vec<Article>;

    /// Whether the backing index answers at all
    async fn ping(&self) -> bool;
}

/// `ArticleSearch` over an Elasticsearch index
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
    index: String,
    builder: SearchQueryBuilder,
    preview_chars: usize,
}

impl ElasticsearchClient {
    /// Create client from search configuration
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(ChatError::HttpError)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            builder: SearchQueryBuilder::from_config(config),
            preview_chars: config.preview_chars,
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get index name
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Search and surface failures instead of swallowing them
    pub async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let body = self.builder.build(query, limit);
        debug!(
            index = %self.index,
            keywords = %body["query"]["bool"]["should"][1]["multi_match"]["query"],
            limit,
            "searching articles"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::SearchError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::SearchError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ChatError::SearchError(format!("Failed to read response: {}", e)))?;

        parse_response(payload, limit, self.preview_chars)
            .map_err(|e| ChatError::SearchError(format!("Failed to parse hits: {}", e)))
    }
}

#[async_trait]
impl ArticleSearch for ElasticsearchClient {
    async fn search(&self, query: &str, limit: usize) -> Vec<Article> {
        match self.try_search(query, limit).await {
            Ok(articles) => {
                debug!(hits = articles.len(), "search complete");
                articles
            }
            Err(e) => {
                warn!(error = %e, "search failed, continuing without articles");
                Vec::new()
            }
        }
    }

    async fn ping(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ElasticsearchClient::new(&SearchConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9200");
        assert_eq!(client.index(), "news_articles");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = SearchConfig {
            url: "http://search.internal:9200/".to_string(),
            ..Default::default()
        };
        let client = ElasticsearchClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://search.internal:9200");
    }

    #[tokio::test]
    async fn test_unreachable_index_degrades_to_empty() {
        let config = SearchConfig {
            url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let client = ElasticsearchClient::new(&config).unwrap();

        assert!(client.try_search("AI 기술 동향", 7).await.is_err());
        assert!(client.search("AI 기술 동향", 7).await.is_empty());
        assert!(!client.ping().await);
    }
}
