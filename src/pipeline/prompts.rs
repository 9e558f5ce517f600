//! Prompt templates for intent analysis, drafting and review
//!
//! Wording is part of the model contract: the reviewer's acceptance marker
//! must appear verbatim in both review prompts.

use crate::types::Article;

/// Reply the reviewer gives when the draft needs no changes
pub const ACCEPT_MARKER: &str = "원본 답변 사용";

const PERSONA: &str = "당신은 AI 뉴스 전문 챗봇입니다.";

/// Classify the question type and name the keywords and target information
pub fn intent_prompt(query: &str) -> String {
    format!(
        "다음 질문의 의도를 파악하여 검색에 사용할 핵심 키워드와 컨텍스트를 추출하세요:

질문: {query}

다음 형식으로 답변하세요:
1. 질문 유형: (사실 확인/날짜 확인/방법 설명/의견 요청/비교 분석 중 선택)
2. 핵심 키워드: (검색에 사용할 중요 단어들)
3. 찾아야 할 정보: (기사에서 찾아야 할 구체적인 정보)"
    )
}

/// No article found: general knowledge only, no recency claims
pub fn knowledge_prompt(query: &str, intent: &str) -> String {
    format!(
        "{PERSONA}

질문: {query}

질문 분석:
{intent}

관련된 뉴스 기사를 찾을 수 없어 일반적인 지식을 기반으로 답변합니다.

답변 시 다음 사항을 준수해주세요:
1. 뉴스 인용이나 시간 정보는 제외합니다.
2. 일반적인 사실과 개념 위주로 설명합니다.
3. 최신 정보가 필요한 경우 \"관련 최신 정보 없음\"을 명시합니다.
4. 정보의 한계를 명확히 설명합니다.

답변 형식:
1. 핵심 답변: (질문에 대한 직접적인 답변)
2. 개념 설명: (주요 개념과 배경 지식)
3. 한계 설명: (정보의 한계와 주의사항)"
    )
}

/// Low-relevance article blended with background knowledge, sources labelled
pub fn hybrid_prompt(query: &str, intent: &str, primary: &Article) -> String {
    format!(
        "{PERSONA}

질문: {query}

질문 분석:
{intent}

관련성이 다소 낮은 뉴스 기사가 있습니다:
제목: {title}
내용: {content}
발행일: {date}

지침:
1. 기사의 관련 내용을 부분적으로 활용하세요.
2. AI 모델의 기본 지식을 활용하여 부족한 정보를 보완하세요.
3. 기사 정보와 일반 지식을 구분하여 제시하세요.
4. 정보의 출처(뉴스/일반 지식)를 명확히 표시하세요.

형식:
1. 직접 답변: (기사 내용 + 일반 지식 결합)
2. 뉴스 정보: (관련 기사 내용 인용)
3. 보충 설명: (AI 모델의 기본 지식 활용)
4. 정보 출처: (각 정보의 출처 명시)",
        title = primary.title,
        content = primary.content,
        date = primary.published_or_placeholder(),
    )
}

/// Relevant article in full plus secondary titles and dates as anchors
pub fn full_context_prompt(
    query: &str,
    intent: &str,
    primary: &Article,
    context_articles: &[Article],
) -> String {
    let related = context_articles
        .iter()
        .map(|a| format!("- {} ({})", a.title, a.published_or_placeholder()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{PERSONA}

질문: {query}

질문 분석:
{intent}

주요 참고 기사:
제목: {title}
내용: {content}
발행일: {date}

추가 참고 기사들:
{related}

지침:
1. 질문 유형에 맞는 적절한 형식으로 답변하세요.
2. 기사의 내용을 우선적으로 활용하세요.
3. 필요한 경우 AI 모델의 배경 지식을 활용하여 맥락을 보완하세요.
4. 기사 정보와 배경 지식을 구분하여 제시하세요.

답변 형식:
1. 핵심 답변: (질문 의도에 맞는 직접적인 답변)
2. 뉴스 근거: (관련 기사 내용 인용)
3. 맥락 설명: (기사 내용 + 보완적 배경 지식)
4. 시간 정보: (관련 사건의 시간 순서나 날짜 정보)",
        title = primary.title,
        content = primary.content,
        date = primary.published_or_placeholder(),
    )
}

fn review_instructions() -> String {
    format!(
        "답변이 개선이 필요한 경우, 위 형식을 유지하면서 답변을 개선하고 개선된 답변만 말해주세요.
개선이 필요없는 경우 \"{ACCEPT_MARKER}\"이라고만 답변해주세요."
    )
}

/// Seven-criterion review of an article-backed draft
pub fn article_review_prompt(
    query: &str,
    draft: &str,
    intent: &str,
    primary: &Article,
    excerpt_chars: usize,
) -> String {
    format!(
        "사용자의 질문과 AI의 답변을 검토하여 개선이 필요한지 평가해주세요.

원래 질문: {query}
질문 의도 분석: {intent}
주요 기사 정보:
- 제목: {title}
- 내용 요약: {excerpt}...
- 발행일: {date}
AI의 답변: {draft}

검토 기준:
1. 질문 의도 부합도
2. 뉴스 기사 활용도
3. 답변의 완성도
4. 시간 정보의 정확성
5. 형식의 적절성
6. 다중 기사 통합 분석
7. 맥락 설명의 충분성

{instructions}",
        title = primary.title,
        excerpt = primary.content_excerpt(excerpt_chars),
        date = primary.published_or_placeholder(),
        instructions = review_instructions(),
    )
}

/// Five-criterion review of a general-knowledge draft
pub fn general_review_prompt(query: &str, draft: &str, intent: &str) -> String {
    format!(
        "사용자의 질문과 AI의 답변을 검토하여 개선이 필요한지 평가해주세요.

원래 질문: {query}
질문 의도 분석: {intent}
AI의 답변: {draft}

검토 기준:
1. 질문 의도 부합도
2. 답변의 완성도와 정확성
3. 설명의 명확성과 논리성
4. 불필요하거나 누락된 정보
5. 답변 형식의 적절성

{instructions}",
        instructions = review_instructions(),
    )
}
