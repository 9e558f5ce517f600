//! Session and statistics tests driven through the public pipeline types

use chrono::NaiveDate;
use newsbuddy::repl::{ChatSession, SessionStats};
use newsbuddy::types::{Article, DraftMode, Highlights, PipelineResult, UNCATEGORIZED};

fn article(title: &str, date: Option<&str>, categories: &[&str]) -> Article {
    Article {
        title: title.to_string(),
        content: String::new(),
        content_preview: String::new(),
        url: format!("https://news.example.com/{}", title),
        published_date: date.map(str::to_string),
        crawled_date: "2024-11-03T00:00:00".to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        score: 4.2,
        highlights: Highlights::default(),
    }
}

fn answered(primary: Article, secondary: Vec<Article>) -> PipelineResult {
    PipelineResult {
        relevance_score: primary.score,
        primary: Some(primary),
        secondary,
        answer: "답변".to_string(),
        mode: Some(DraftMode::FullContext),
    }
}

#[test]
fn test_conversation_feeds_statistics() {
    let mut session = ChatSession::new();

    session.record(
        "AI 기술 동향",
        &answered(
            article("AI 보고서", Some("2024-11-02T09:30:00"), &["IT", "경제"]),
            vec![article("반도체", None, &["IT"])],
        ),
    );
    session.record("양자 컴퓨터", &PipelineResult::apology());
    session.record(
        "AI 기술 동향",
        &answered(article("AI 규제", Some("2024-10-30"), &[]), Vec::new()),
    );

    assert_eq!(session.turn_count(), 3);
    assert_eq!(session.search_history(), &["AI 기술 동향", "양자 컴퓨터"]);

    let stats = SessionStats::from_session(&session);
    assert_eq!(stats.total_searches, 2);
    assert_eq!(stats.total_articles, 2);
    assert_eq!(stats.category_total(), 3);
    assert!(stats.categories.contains(&(UNCATEGORIZED.to_string(), 1)));
    assert_eq!(stats.latest_date, NaiveDate::from_ymd_opt(2024, 11, 2));
    assert_eq!(stats.recent_searches, vec!["양자 컴퓨터", "AI 기술 동향"]);
}

#[test]
fn test_reset_clears_statistics_but_not_searches() {
    let mut session = ChatSession::new();
    session.record(
        "AI 기술 동향",
        &answered(article("AI 보고서", Some("2024-11-02"), &["IT"]), Vec::new()),
    );

    session.reset();
    let stats = SessionStats::from_session(&session);

    assert!(!stats.has_articles());
    assert!(stats.categories.is_empty());
    assert_eq!(stats.total_searches, 1);
}

#[test]
fn test_session_serializes() {
    let mut session = ChatSession::new();
    session.record("질문", &PipelineResult::apology());

    let json = serde_json::to_string(&session).unwrap();
    let restored: ChatSession = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.id(), session.id());
    assert_eq!(restored.turn_count(), 1);
    assert_eq!(restored.turns()[0].mode, None);
}
