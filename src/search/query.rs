//! Elasticsearch request body and hit decoding
//!
//! The query is a disjunction of an exact phrase clause over the article body
//! and a fuzzy multi-field clause over the extracted keywords.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::cli::config::SearchConfig;
use crate::search::keywords::keyword_string;
use crate::types::{Article, Highlights, NO_DATE_INFO};

/// Separator between highlighted content fragments in a preview
pub const PREVIEW_SEPARATOR: &str = " ... ";

/// Emphasis markers wrapped around highlighted terms
pub const HIGHLIGHT_PRE_TAG: &str = "<strong>";
pub const HIGHLIGHT_POST_TAG: &str = "</strong>";

/// Fields requested from `_source`
const SOURCE_FIELDS: &[&str] = &[
    "title",
    "cleaned_content",
    "url",
    "crawled_date",
    "published_date",
    "categories",
];

/// Fuzzy clause fields, highest weight first
const FUZZY_FIELDS: &[&str] = &[
    "title^3",
    "title.ngram^2",
    "cleaned_content^2",
    "cleaned_content.ngram",
];

/// Builds `_search` request bodies from search settings
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    phrase_slop: u32,
    phrase_boost: f64,
    fragment_size: usize,
    fragments: usize,
}

impl SearchQueryBuilder {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            phrase_slop: config.phrase_slop,
            phrase_boost: config.phrase_boost,
            fragment_size: config.content_fragment_size,
            fragments: config.content_fragments,
        }
    }

    /// Full request body for `query`, capped at `limit` hits
    pub fn build(&self, query: &str, limit: usize) -> Value {
        let keywords = keyword_string(query);

        json!({
            "query": {
                "bool": {
                    "should": [
                        {
                            "match_phrase": {
                                "cleaned_content": {
                                    "query": query,
                                    "boost": self.phrase_boost,
                                    "slop": self.phrase_slop,
                                }
                            }
                        },
                        {
                            "multi_match": {
                                "query": keywords,
                                "fields": FUZZY_FIELDS,
                                "type": "best_fields",
                                "operator": "or",
                                "fuzziness": "AUTO",
                            }
                        }
                    ],
                    "minimum_should_match": 1,
                }
            },
            "highlight": {
                "fields": {
                    "title": { "number_of_fragments": 1 },
                    "cleaned_content": {
                        "number_of_fragments": self.fragments,
                        "fragment_size": self.fragment_size,
                    }
                },
                "pre_tags": [HIGHLIGHT_PRE_TAG],
                "post_tags": [HIGHLIGHT_POST_TAG],
            },
            "_source": SOURCE_FIELDS,
            "size": limit,
            "sort": [{ "_score": "desc" }],
        })
    }
}

impl Default for SearchQueryBuilder {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

/// Top-level `_search` response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// A single scored hit
#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: HitSource,
    #[serde(default)]
    pub highlight: HitHighlight,
}

#[derive(Debug, Deserialize)]
pub struct HitSource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cleaned_content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub crawled_date: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HitHighlight {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub cleaned_content: Vec<String>,
}

impl Hit {
    /// Convert to an `Article`, computing the preview
    pub fn into_article(self, preview_chars: usize) -> Article {
        let content_preview = build_preview(
            &self.highlight.cleaned_content,
            &self.source.cleaned_content,
            preview_chars,
        );

        Article {
            title: self.source.title,
            content: self.source.cleaned_content,
            content_preview,
            url: self.source.url,
            published_date: self.source.published_date.filter(|d| !d.is_empty()),
            crawled_date: self
                .source
                .crawled_date
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DATE_INFO.to_string()),
            categories: self.source.categories,
            score: self.score.unwrap_or(0.0).max(0.0),
            highlights: Highlights {
                title: self.highlight.title,
                content: self.highlight.cleaned_content,
            },
        }
    }
}

/// Joined highlight fragments, or a truncated content prefix with an ellipsis
pub fn build_preview(fragments: &[String], content: &str, preview_chars: usize) -> String {
    let joined = fragments.join(PREVIEW_SEPARATOR);
    if !joined.is_empty() {
        return joined;
    }

    let mut preview: String = content.chars().take(preview_chars).collect();
    preview.push_str("...");
    preview
}

/// Decode a `_search` response into score-ordered articles, at most `limit`
pub fn parse_response(body: Value, limit: usize, preview_chars: usize) -> serde_json::Result<Vec<Article>> {
    let response: SearchResponse = serde_json::from_value(body)?;

    let mut articles: Vec<Article> = response
        .hits
        .hits
        .into_iter()
        .map(|hit| hit.into_article(preview_chars))
        .collect();

    // Stable sort keeps engine order among equal scores.
    articles.sort_by(|a, b| b.score.total_cmp(&a.score));
    articles.truncate(limit);
    Ok(articles)
}
