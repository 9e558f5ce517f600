//! Terminal output for answers and article cards

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::config::DisplayConfig;
use crate::types::{Article, PipelineResult};

/// Spinner tick rate
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Renders pipeline results and status lines
pub struct DisplayManager {
    min_article_score: f64,
    max_related_shown: usize,
    spinner: Option<ProgressBar>,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self::with_config(&DisplayConfig::default())
    }

    pub fn with_config(config: &DisplayConfig) -> Self {
        DisplayManager {
            min_article_score: config.min_article_score,
            max_related_shown: config.max_related_shown,
            spinner: None,
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, provider: &str, model: &str, index: &str) {
        let width = 64;
        let rule = "=".repeat(width);
        let title = format!("  NewsBuddy {} - AI 뉴스 챗봇", version);
        let info = format!("  Model: {} ({}) | Index: {}", model, provider, index);

        println!("\n{}", rule.cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "뉴스 기사에 대해 궁금한 점을 물어보세요 ({} 명령 목록, {} 종료)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Start a spinner while the pipeline runs
    pub fn start_spinner(&mut self, message: &str) -> ProgressBar {
        self.finish_spinner();

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK_INTERVAL);

        self.spinner = Some(pb.clone());
        pb
    }

    pub fn finish_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    /// Answer text, then the article card when the primary is relevant enough
    pub fn show_result(&mut self, result: &PipelineResult) {
        self.finish_spinner();

        println!();
        if result.is_apology() {
            println!("{}", result.answer.red());
        } else {
            println!("{}", result.answer);
        }
        println!();

        if let Some(primary) = self.card_article(result) {
            self.show_article_card(primary, result.relevance_score);
            self.show_related(&result.secondary);
        }
    }

    /// The primary article, if its score clears the display threshold
    pub fn card_article<'a>(&self, result: &'a PipelineResult) -> Option<&'a Article> {
        result
            .primary
            .as_ref()
            .filter(|_| result.relevance_score > self.min_article_score)
    }

    /// Secondary articles that fit under the card
    pub fn related<'a>(&self, secondary: &'a [Article]) -> &'a [Article] {
        &secondary[..secondary.len().min(self.max_related_shown)]
    }

    fn show_article_card(&self, article: &Article, score: f64) {
        println!("{}", "📰 관련 기사".bold().cyan());
        println!("{}", "-".repeat(60).cyan());
        println!("  {}", article.title.bold());
        println!("  발행일:   {}", article.published_or_placeholder());
        println!("  관련도:   {}", format!("{:.2}", score).green());
        println!("  링크:     {}", article.url.blue());
        println!("  카테고리: {}", article.categories_label());
    }

    fn show_related(&self, secondary: &[Article]) {
        let related = self.related(secondary);
        if related.is_empty() {
            println!();
            return;
        }

        println!("\n  {}", "📚 추가 관련 기사".bold());
        for (i, article) in related.iter().enumerate() {
            println!(
                "  {}. {} {}",
                (i + 1).to_string().cyan(),
                article.title,
                format!("({})", article.published_or_placeholder()).dimmed()
            );
        }
        println!();
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}
