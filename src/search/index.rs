//! Article index maintenance
//!
//! Installs the article mapping and bulk-loads crawler records (read from a
//! JSON-lines dump of the document store) into Elasticsearch, keyed by url.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::config::SearchConfig;
use crate::errors::{ChatError, Result};

/// Documents per `_bulk` request
const BULK_BATCH_SIZE: usize = 500;

/// Record written by the crawler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawledRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cleaned_content: String,
    pub url: String,
    #[serde(default)]
    pub crawled_date: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub metadata: RecordMetadata,
}

/// Text statistics computed at crawl time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub sentence_count: u64,
    #[serde(default)]
    pub common_words: serde_json::Map<String, Value>,
}

impl CrawledRecord {
    /// Index document body. Empty dates are dropped so date parsing never fails.
    pub fn to_document(&self) -> Value {
        let mut doc = json!({
            "title": self.title,
            "cleaned_content": self.cleaned_content,
            "url": self.url,
            "categories": self.categories,
            "metadata": {
                "word_count": self.metadata.word_count,
                "sentence_count": self.metadata.sentence_count,
                "common_words": self.metadata.common_words,
            },
        });

        for (field, value) in [
            ("crawled_date", &self.crawled_date),
            ("published_date", &self.published_date),
        ] {
            if let Some(date) = value.as_deref().filter(|d| !d.trim().is_empty()) {
                doc[field] = Value::String(date.to_string());
            }
        }

        doc
    }
}

/// Outcome of loading or syncing records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Read crawler records from a JSON-lines file. Bad lines are counted, not fatal.
pub fn load_records(path: &Path) -> Result<(Vec<CrawledRecord>, usize)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut malformed = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<CrawledRecord>(&line) {
            Ok(record) if !record.url.trim().is_empty() => records.push(record),
            Ok(_) => {
                warn!(line = line_no + 1, "skipping record without url");
                malformed += 1;
            }
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "skipping malformed record");
                malformed += 1;
            }
        }
    }

    Ok((records, malformed))
}

/// Article index mapping: Korean analyzer plus english and ngram sub-fields
pub fn index_schema() -> Value {
    let text_with_variants = json!({
        "type": "text",
        "analyzer": "korean",
        "fields": {
            "english": { "type": "text", "analyzer": "english" },
            "ngram": { "type": "text", "analyzer": "standard" }
        }
    });

    let mut title = text_with_variants.clone();
    title["fields"]["keyword"] = json!({ "type": "keyword" });

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0,
            "analysis": {
                "analyzer": {
                    "korean": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "trim", "stop"]
                    }
                }
            }
        },
        "mappings": {
            "dynamic": false,
            "properties": {
                "title": title,
                "cleaned_content": text_with_variants,
                "original_content": text_with_variants,
                "url": { "type": "keyword" },
                "crawled_date": {
                    "type": "date",
                    "format": "strict_date_optional_time||epoch_millis"
                },
                "published_date": {
                    "type": "date",
                    "format": "strict_date_optional_time||epoch_millis"
                },
                "categories": { "type": "keyword" },
                "metadata": {
                    "type": "object",
                    "properties": {
                        "word_count": { "type": "integer" },
                        "sentence_count": { "type": "integer" },
                        "common_words": { "type": "object", "enabled": false }
                    }
                }
            }
        }
    })
}

/// NDJSON body for one `_bulk` batch
pub fn bulk_body(index: &str, records: &[CrawledRecord]) -> String {
    let mut body = String::new();
    for record in records {
        let action = json!({ "index": { "_index": index, "_id": record.url } });
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&record.to_document().to_string());
        body.push('\n');
    }
    body
}

/// Count per-item outcomes in a `_bulk` response
pub fn count_bulk_items(response: &Value) -> SyncReport {
    let mut report = SyncReport::default();

    let items = match response.get("items").and_then(Value::as_array) {
        Some(items) => items,
        None => return report,
    };

    for item in items {
        let outcome = item.get("index").or_else(|| item.get("create"));
        let failed = match outcome {
            Some(result) => {
                result.get("error").is_some()
                    || result
                        .get("status")
                        .and_then(Value::as_u64)
                        .map(|s| s >= 300)
                        .unwrap_or(true)
            }
            None => true,
        };

        if failed {
            report.failed += 1;
        } else {
            report.succeeded += 1;
        }
    }

    report
}

/// Outcome of one bulk batch from its raw response body.
/// An undecodable body fails the whole batch.
pub fn tally_batch(batch_len: usize, body: &str) -> SyncReport {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => {
            let succeeded = count_bulk_items(&payload).succeeded.min(batch_len);
            SyncReport { succeeded, failed: batch_len - succeeded }
        }
        Err(e) => {
            warn!(error = %e, batch = batch_len, "bulk response not decodable");
            SyncReport { succeeded: 0, failed: batch_len }
        }
    }
}

/// Creates the article index and syncs records into it
pub struct IndexManager {
    client: Client,
    base_url: String,
    index: String,
}

impl IndexManager {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(ChatError::HttpError)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        })
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.index)
    }

    /// Check whether the index exists
    pub async fn exists(&self) -> Result<bool> {
        let response = self
            .client
            .head(&self.index_url())
            .send()
            .await
            .map_err(|e| ChatError::IndexError(format!("Failed to reach index: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(ChatError::IndexError(format!("HTTP {} checking index", status))),
        }
    }

    /// Install the mapping. With `recreate`, an existing index is dropped first.
    pub async fn create_index(&self, recreate: bool) -> Result<()> {
        if self.exists().await? {
            if !recreate {
                info!(index = %self.index, "index already exists");
                return Ok(());
            }

            let response = self
                .client
                .delete(&self.index_url())
                .send()
                .await
                .map_err(|e| ChatError::IndexError(format!("Failed to delete index: {}", e)))?;
            Self::ensure_success(response, "delete index").await?;
            info!(index = %self.index, "dropped existing index");
        }

        let response = self
            .client
            .put(&self.index_url())
            .json(&index_schema())
            .send()
            .await
            .map_err(|e| ChatError::IndexError(format!("Failed to create index: {}", e)))?;
        Self::ensure_success(response, "create index").await?;

        info!(index = %self.index, "created index");
        Ok(())
    }

    /// Bulk-index records in batches. A failing batch counts all its records as failed.
    pub async fn sync_articles(&self, records: &[CrawledRecord]) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let url = format!("{}/_bulk", self.base_url);

        for batch in records.chunks(BULK_BATCH_SIZE) {
            let result = self
                .client
                .post(&url)
                .header("Content-Type", "application/x-ndjson")
                .body(bulk_body(&self.index, batch))
                .send()
                .await;

            let response = match result {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    warn!(status = %response.status(), batch = batch.len(), "bulk batch rejected");
                    report.failed += batch.len();
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, batch = batch.len(), "bulk batch failed");
                    report.failed += batch.len();
                    continue;
                }
            };

            let batch_report = match response.text().await {
                Ok(body) => tally_batch(batch.len(), &body),
                Err(e) => {
                    warn!(error = %e, batch = batch.len(), "bulk response unreadable");
                    SyncReport { succeeded: 0, failed: batch.len() }
                }
            };
            report.succeeded += batch_report.succeeded;
            report.failed += batch_report.failed;

            info!(synced = report.succeeded, failed = report.failed, "bulk batch done");
        }

        // Make the new documents searchable right away.
        let refresh = format!("{}/_refresh", self.index_url());
        if let Err(e) = self.client.post(&refresh).send().await {
            warn!(error = %e, "index refresh failed");
        }

        Ok(report)
    }

    async fn ensure_success(response: reqwest::Response, action: &str) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ChatError::IndexError(format!("Failed to {} (HTTP {}): {}", action, status, body)))
    }
}
