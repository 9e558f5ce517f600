//! Interactive chat loop
//!
//! Reads questions, runs them through the pipeline, prints the answer and
//! article card, and keeps per-session history for the built-in commands.

pub mod commands;
pub mod display;
pub mod input;
pub mod session;
pub mod stats;

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::config::DisplayConfig;
use crate::pipeline::NewsChatbot;
use crate::repl::commands::{is_command, CommandHandler};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputEvent, InputHandler};
pub use crate::repl::session::{ChatSession, ChatTurn};
pub use crate::repl::stats::SessionStats;
use crate::types::PipelineResult;

/// REPL session coordinator
pub struct ReplSession {
    chatbot: NewsChatbot,
    input_handler: InputHandler,
    command_handler: CommandHandler,
    session: ChatSession,
    display_manager: DisplayManager,
    show_progress: bool,
}

impl ReplSession {
    pub fn new(chatbot: NewsChatbot, display: &DisplayConfig) -> Result<Self> {
        Self::build(chatbot, InputHandler::new()?, display)
    }

    /// Create with persistent input history
    pub fn with_history(chatbot: NewsChatbot, display: &DisplayConfig, history_path: PathBuf) -> Result<Self> {
        Self::build(chatbot, InputHandler::with_history(history_path)?, display)
    }

    fn build(chatbot: NewsChatbot, input_handler: InputHandler, display: &DisplayConfig) -> Result<Self> {
        Ok(ReplSession {
            chatbot,
            input_handler,
            command_handler: CommandHandler::new(),
            session: ChatSession::new(),
            display_manager: DisplayManager::with_config(display),
            show_progress: true,
        })
    }

    /// Hide the spinner (quiet mode)
    pub fn set_show_progress(&mut self, show: bool) {
        self.show_progress = show;
    }

    pub fn show_welcome(&self, version: &str, provider: &str, model: &str, index: &str) {
        self.display_manager.show_banner(version, provider, model, index);
    }

    /// Run until exit or EOF, then save input history
    pub async fn run(&mut self) -> Result<()> {
        debug!(session = %self.session.id(), "repl started");

        loop {
            let line = match self.input_handler.read_line()? {
                InputEvent::Line(line) => line,
                InputEvent::Interrupted => {
                    self.display_manager.show_info("Ctrl-D 또는 /exit 로 종료합니다.");
                    continue;
                }
                InputEvent::Eof => break,
            };

            if !self.handle_input(&line).await? {
                break;
            }
        }

        self.input_handler.save_history()?;
        debug!(turns = self.session.turn_count(), "repl finished");
        Ok(())
    }

    /// Handle one line. Returns false when the session should end.
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(true);
        }

        if is_command(input) {
            let command = self.command_handler.parse(input);
            return self.command_handler.execute(command, &mut self.session);
        }

        let result = self.ask(input).await;
        self.display_manager.show_result(&result);
        Ok(true)
    }

    /// Run the pipeline for one question and record it
    pub async fn ask(&mut self, query: &str) -> PipelineResult {
        if self.show_progress {
            self.display_manager.start_spinner("관련 기사를 검색하고 답변을 생성하고 있습니다...");
        }

        let result = self.chatbot.process_query(query).await;
        self.display_manager.finish_spinner();

        self.session.record(query, &result);
        result
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result as ChatResult;
    use crate::llm::GenerativeModel;
    use crate::search::ArticleSearch;
    use crate::types::article::sample_article;
    use crate::types::Article;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct OneHit;

    #[async_trait]
    impl ArticleSearch for OneHit {
        async fn search(&self, _query: &str, _limit: usize) -> Vec<Article> {
            vec![sample_article("AI 반도체", 6.0)]
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    struct Accepting;

    #[async_trait]
    impl GenerativeModel for Accepting {
        async fn generate(&self, prompt: &str) -> ChatResult<String> {
            if prompt.contains(crate::pipeline::prompts::ACCEPT_MARKER) {
                Ok(crate::pipeline::prompts::ACCEPT_MARKER.to_string())
            } else {
                Ok("초안".to_string())
            }
        }

        async fn health_check(&self) -> ChatResult<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "test"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    fn repl() -> ReplSession {
        let chatbot = NewsChatbot::new(Arc::new(OneHit), Arc::new(Accepting));
        let mut repl = ReplSession::new(chatbot, &DisplayConfig::default()).unwrap();
        repl.set_show_progress(false);
        repl
    }

    #[tokio::test]
    async fn test_question_is_answered_and_recorded() {
        let mut repl = repl();
        assert!(repl.handle_input("AI 반도체 전망").await.unwrap());

        let session = repl.session();
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.turns()[0].answer, "초안");
        assert_eq!(session.article_history()[0].title, "AI 반도체");
    }

    #[tokio::test]
    async fn test_commands_and_blank_lines() {
        let mut repl = repl();
        assert!(repl.handle_input("   ").await.unwrap());
        assert!(repl.handle_input("/stats").await.unwrap());
        assert!(!repl.handle_input("exit").await.unwrap());
        assert_eq!(repl.session().turn_count(), 0);
    }
}
