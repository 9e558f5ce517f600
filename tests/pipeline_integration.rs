//! Integration tests for the NewsBuddy query pipeline
//!
//! Runs end-to-end queries against in-memory search and scripted models,
//! without an Elasticsearch cluster or model provider.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use newsbuddy::{
    cli::Config,
    errors::{ChatError, Result},
    llm::GenerativeModel,
    pipeline::{prompts::ACCEPT_MARKER, NewsChatbot},
    search::{query::parse_response, ArticleSearch, ElasticsearchClient},
    types::{Article, DraftMode, Highlights, APOLOGY_ANSWER},
};

fn article(title: &str, score: f64) -> Article {
    Article {
        title: title.to_string(),
        content: format!("{} 관련 본문입니다. 인공지능 산업이 빠르게 성장하고 있습니다.", title),
        content_preview: format!("{} 관련 본문", title),
        url: format!("https://news.example.com/{}", title.replace(' ', "-")),
        published_date: Some("2024-11-02T09:30:00".to_string()),
        crawled_date: "2024-11-03T00:00:00".to_string(),
        categories: vec!["IT".to_string()],
        score,
        highlights: Highlights::default(),
    }
}

/// In-memory search returning fixed hits in engine order
struct FixedSearch {
    hits: Vec<Article>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FixedSearch {
    fn new(hits: Vec<Article>) -> Self {
        Self {
            hits,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ArticleSearch for FixedSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<Article> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        self.hits.iter().take(limit).cloned().collect()
    }

    async fn ping(&self) -> bool {
        true
    }
}

/// Answers by prompt kind and records every prompt it receives
struct ScriptedModel {
    review_reply: String,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn accepting() -> Self {
        Self::with_review(ACCEPT_MARKER)
    }

    fn with_review(reply: &str) -> Self {
        Self {
            review_reply: reply.to_string(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            review_reply: String::new(),
            fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ChatError::model_api("scripted", "service unavailable"));
        }

        let reply = if prompt.contains(ACCEPT_MARKER) {
            self.review_reply.clone()
        } else if prompt.contains("질문의 의도를 파악") {
            "1. 질문 유형: 사실 확인\n2. 핵심 키워드: AI, 기술, 동향".to_string()
        } else {
            "핵심 답변: AI 기술은 빠르게 발전하고 있습니다.".to_string()
        };
        Ok(reply)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }
}

#[tokio::test]
async fn test_ranked_hits_produce_full_context_answer() {
    let search = Arc::new(FixedSearch::new(vec![
        article("AI 기술 동향 보고서", 12.4),
        article("AI 반도체 시장", 3.1),
    ]));
    let model = Arc::new(ScriptedModel::accepting());
    let bot = NewsChatbot::new(search.clone(), model.clone());

    let result = bot.process_query("AI 기술 동향").await;

    assert_eq!(result.primary.as_ref().unwrap().title, "AI 기술 동향 보고서");
    assert_eq!(result.secondary.len(), 1);
    assert_eq!(result.secondary[0].title, "AI 반도체 시장");
    assert_eq!(result.relevance_score, 12.4);
    assert_eq!(result.mode, Some(DraftMode::FullContext));
    assert_eq!(result.answer, "핵심 답변: AI 기술은 빠르게 발전하고 있습니다.");

    assert_eq!(
        search.queries.lock().unwrap().as_slice(),
        &[("AI 기술 동향".to_string(), 7)]
    );

    // intent, draft, review, in that order
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("질문의 의도를 파악"));
    assert!(prompts[1].contains("주요 참고 기사"));
    assert!(prompts[1].contains("- AI 반도체 시장 ("));
    assert!(prompts[2].contains("주요 기사 정보"));
}

#[tokio::test]
async fn test_no_hits_answers_from_general_knowledge() {
    let model = Arc::new(ScriptedModel::accepting());
    let bot = NewsChatbot::new(Arc::new(FixedSearch::new(Vec::new())), model.clone());

    let result = bot.process_query("양자 컴퓨터의 원리는?").await;

    assert!(result.primary.is_none());
    assert!(result.secondary.is_empty());
    assert_eq!(result.relevance_score, 0.0);
    assert_eq!(result.mode, Some(DraftMode::NoArticle));

    let prompts = model.prompts();
    assert!(prompts[1].contains("관련된 뉴스 기사를 찾을 수 없어"));
    assert!(!prompts[2].contains("주요 기사 정보"));
}

#[tokio::test]
async fn test_weak_hit_uses_hybrid_mode() {
    let model = Arc::new(ScriptedModel::accepting());
    let bot = NewsChatbot::new(
        Arc::new(FixedSearch::new(vec![article("약한 관련 기사", 0.12)])),
        model.clone(),
    );

    let result = bot.process_query("AI 기술 동향").await;

    assert_eq!(result.mode, Some(DraftMode::Hybrid));
    assert_eq!(result.relevance_score, 0.12);
    assert!(model.prompts()[1].contains("관련성이 다소 낮은"));
}

#[tokio::test]
async fn test_unreachable_search_engine_degrades_to_no_article() {
    let mut config = Config::default();
    config.search.url = "http://127.0.0.1:1".to_string();
    let search = Arc::new(ElasticsearchClient::new(&config.search).unwrap());
    let bot = NewsChatbot::from_config(&config, search, Arc::new(ScriptedModel::accepting()));

    let result = bot.process_query("AI 기술 동향").await;

    assert!(result.primary.is_none());
    assert_eq!(result.mode, Some(DraftMode::NoArticle));
    assert!(!result.is_apology());
}

#[tokio::test]
async fn test_reviewer_replacement_wins() {
    let bot = NewsChatbot::new(
        Arc::new(FixedSearch::new(vec![article("AI 기술 동향 보고서", 8.0)])),
        Arc::new(ScriptedModel::with_review("개선된 답변: 최근 AI 투자가 늘었습니다.")),
    );

    let result = bot.process_query("AI 기술 동향").await;
    assert_eq!(result.answer, "개선된 답변: 최근 AI 투자가 늘었습니다.");
}

#[tokio::test]
async fn test_marker_inside_longer_reply_keeps_draft() {
    let bot = NewsChatbot::new(
        Arc::new(FixedSearch::new(Vec::new())),
        Arc::new(ScriptedModel::with_review("검토 결과: \"원본 답변 사용\"")),
    );

    let result = bot.process_query("질문").await;
    assert_eq!(result.answer, "핵심 답변: AI 기술은 빠르게 발전하고 있습니다.");
}

#[tokio::test]
async fn test_model_failure_returns_apology() {
    let bot = NewsChatbot::new(
        Arc::new(FixedSearch::new(vec![article("AI 기술 동향 보고서", 12.4)])),
        Arc::new(ScriptedModel::failing()),
    );

    let result = bot.process_query("AI 기술 동향").await;

    assert!(result.is_apology());
    assert_eq!(result.answer, APOLOGY_ANSWER);
    assert!(result.primary.is_none());
    assert!(result.secondary.is_empty());
    assert_eq!(result.relevance_score, 0.0);
}

#[tokio::test]
async fn test_repeated_queries_are_independent() {
    let bot = NewsChatbot::new(
        Arc::new(FixedSearch::new(vec![
            article("AI 기술 동향 보고서", 12.4),
            article("AI 반도체 시장", 3.1),
        ])),
        Arc::new(ScriptedModel::accepting()),
    );

    let first = bot.process_query("AI 기술 동향").await;
    let second = bot.process_query("AI 기술 동향").await;

    assert_eq!(first.primary, second.primary);
    assert_eq!(first.secondary, second.secondary);
    assert_eq!(first.mode, second.mode);
    assert_eq!(first.answer, second.answer);
}

#[test]
fn test_engine_response_is_ranked_and_truncated() {
    let body = json!({
        "hits": {
            "hits": [
                {
                    "_score": 3.1,
                    "_source": { "title": "AI 반도체 시장", "cleaned_content": "본문 B", "url": "u2" }
                },
                {
                    "_score": 12.4,
                    "_source": { "title": "AI 기술 동향 보고서", "cleaned_content": "본문 A", "url": "u1" },
                    "highlight": { "cleaned_content": ["<strong>AI</strong> 기술", "동향"] }
                },
                {
                    "_score": 1.0,
                    "_source": { "title": "기타", "cleaned_content": "본문 C", "url": "u3" }
                }
            ]
        }
    });

    let articles = parse_response(body, 2, 300).unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].url, "u1");
    assert_eq!(articles[0].content_preview, "<strong>AI</strong> 기술 ... 동향");
    assert_eq!(articles[1].url, "u2");
    assert_eq!(articles[1].content_preview, "본문 B...");
}
