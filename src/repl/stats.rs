//! Session analytics for the `/stats` command

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::repl::session::ChatSession;
use crate::types::{Article, UNCATEGORIZED};

/// Searches listed under "recent searches"
pub const RECENT_SEARCHES: usize = 5;

/// Aggregates over the articles and searches of one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// (category, count), most frequent first; ties by name
    pub categories: Vec<(String, usize)>,
    /// (publication date, count), newest first
    pub dates: Vec<(NaiveDate, usize)>,
    pub total_searches: usize,
    pub total_articles: usize,
    pub latest_date: Option<NaiveDate>,
    /// Newest first
    pub recent_searches: Vec<String>,
}

impl SessionStats {
    pub fn from_session(session: &ChatSession) -> Self {
        let articles = session.article_history();

        let categories = category_distribution(articles);
        let dates = date_distribution(articles);
        let latest_date = dates.first().map(|(date, _)| *date);

        Self {
            categories,
            dates,
            total_searches: session.search_history().len(),
            total_articles: articles.len(),
            latest_date,
            recent_searches: session
                .recent_searches(RECENT_SEARCHES)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Total category assignments, the denominator for percentages
    pub fn category_total(&self) -> usize {
        self.categories.iter().map(|(_, n)| n).sum()
    }

    /// Share of a count among all category assignments, in percent
    pub fn category_percentage(&self, count: usize) -> f64 {
        let total = self.category_total();
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    }

    pub fn has_articles(&self) -> bool {
        self.total_articles > 0
    }
}

fn category_distribution(articles: &[Article]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for article in articles {
        if article.categories.is_empty() {
            *counts.entry(UNCATEGORIZED).or_insert(0) += 1;
        }
        for category in &article.categories {
            *counts.entry(category.as_str()).or_insert(0) += 1;
        }
    }

    let mut distribution: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}

fn date_distribution(articles: &[Article]) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in articles.iter().filter_map(publication_day) {
        *counts.entry(date).or_insert(0) += 1;
    }
    counts.into_iter().rev().collect()
}

/// Calendar day of the publication date; undated articles are skipped
pub fn publication_day(article: &Article) -> Option<NaiveDate> {
    let raw = article.published_date.as_deref()?.trim();
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
