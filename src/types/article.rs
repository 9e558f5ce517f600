//! News article as returned by the search layer

use serde::{Deserialize, Serialize};

/// Placeholder shown wherever a date is missing
pub const NO_DATE_INFO: &str = "날짜 정보 없음";

/// Placeholder category for articles without categories
pub const UNCATEGORIZED: &str = "미분류";

/// Highlighted fragments returned alongside a hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub title: Vec<String>,
    pub content: Vec<String>,
}

/// A scored search hit. Built fresh per search call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Full cleaned article text
    pub content: String,
    /// Highlighted fragments joined by `" ... "`, or a truncated prefix of `content`
    pub content_preview: String,
    /// Unique identifier of the article
    pub url: String,
    /// ISO-8601 publication date, if the crawler found one
    pub published_date: Option<String>,
    /// ISO-8601 crawl timestamp
    pub crawled_date: String,
    pub categories: Vec<String>,
    /// Raw engine relevance score, unbounded above
    pub score: f64,
    #[serde(default)]
    pub highlights: Highlights,
}

impl Article {
    /// Publication date or the "no information" placeholder
    pub fn published_or_placeholder(&self) -> &str {
        self.published_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_DATE_INFO)
    }

    /// Comma-separated categories, `미분류` when there are none
    pub fn categories_label(&self) -> String {
        if self.categories.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            self.categories.join(", ")
        }
    }

    /// First `max_chars` characters of the content
    pub fn content_excerpt(&self, max_chars: usize) -> String {
        truncate_chars(&self.content, max_chars)
    }
}

/// Truncate on character (not byte) boundaries
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
pub(crate) fn sample_article(title: &str, score: f64) -> Article {
    Article {
        title: title.to_string(),
        content: format!("{} 본문 내용입니다.", title),
        content_preview: format!("{} 본문", title),
        url: format!("https://news.example.com/{}", title.replace(' ', "-")),
        published_date: Some("2024-11-02T09:30:00".to_string()),
        crawled_date: "2024-11-03T00:00:00".to_string(),
        categories: vec!["AI".to_string()],
        score,
        highlights: Highlights::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_placeholder() {
        let mut article = sample_article("AI 기술", 1.0);
        assert_eq!(article.published_or_placeholder(), "2024-11-02T09:30:00");

        article.published_date = None;
        assert_eq!(article.published_or_placeholder(), NO_DATE_INFO);

        article.published_date = Some("  ".to_string());
        assert_eq!(article.published_or_placeholder(), NO_DATE_INFO);
    }

    #[test]
    fn test_categories_label() {
        let mut article = sample_article("AI 기술", 1.0);
        article.categories.push("스타트업".to_string());
        assert_eq!(article.categories_label(), "AI, 스타트업");

        article.categories.clear();
        assert_eq!(article.categories_label(), UNCATEGORIZED);
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        let text = "인공지능 뉴스";
        assert_eq!(truncate_chars(text, 4), "인공지능");
        assert_eq!(truncate_chars(text, 100), text);
    }
}
