//! Search layer
//!
//! Keyword extraction, the Elasticsearch query and client, and index upkeep.
//!
//! Components:
//! - Keywords: stop-word stripping for the fuzzy clause
//! - Query: request body and hit decoding
//! - Client: `ArticleSearch` over Elasticsearch
//! - Index: mapping installation and bulk sync of crawler records

pub mod keywords;
pub mod query;
pub mod client;
pub mod index;

// Re-export key types
pub use keywords::{extract_keywords, keyword_string};
pub use query::SearchQueryBuilder;
pub use client::{ArticleSearch, ElasticsearchClient};
pub use index::{CrawledRecord, IndexManager, SyncReport};
