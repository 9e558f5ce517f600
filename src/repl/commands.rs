//! Built-in REPL commands

use anyhow::Result;
use colored::*;

use crate::repl::session::ChatSession;
use crate::repl::stats::SessionStats;

/// Turns listed by `/history` without an argument
const DEFAULT_HISTORY_LIMIT: usize = 10;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    History { limit: Option<usize> },
    Articles,
    Stats,
    Reset,
    Clear,
    Exit,
    Unknown { input: String },
}

/// Parses and executes REPL commands
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        CommandHandler
    }

    /// Parse input into a command
    pub fn parse(&self, input: &str) -> Command {
        let trimmed = input.trim();

        if is_exit_word(trimmed) {
            return Command::Exit;
        }

        let Some(body) = trimmed.strip_prefix('/') else {
            return Command::Unknown { input: input.to_string() };
        };

        let parts: Vec<&str> = body.split_whitespace().collect();
        let Some(name) = parts.first() else {
            return Command::Unknown { input: input.to_string() };
        };

        match name.to_lowercase().as_str() {
            "help" | "h" => Command::Help,
            "history" => {
                let limit = parts.get(1).and_then(|s| s.parse().ok());
                Command::History { limit }
            }
            "articles" => Command::Articles,
            "stats" => Command::Stats,
            "reset" => Command::Reset,
            "clear" | "cls" => Command::Clear,
            "exit" | "quit" | "q" => Command::Exit,
            _ => Command::Unknown { input: input.to_string() },
        }
    }

    /// Execute a command. Returns false when the REPL should exit.
    pub fn execute(&self, command: Command, session: &mut ChatSession) -> Result<bool> {
        match command {
            Command::Help => self.show_help(),
            Command::History { limit } => {
                self.show_history(session, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            }
            Command::Articles => self.show_articles(session),
            Command::Stats => self.show_stats(&SessionStats::from_session(session)),
            Command::Reset => {
                session.reset();
                println!("{}", "대화 내용이 초기화되었습니다.".yellow());
            }
            Command::Clear => {
                print!("\x1B[2J\x1B[1;1H");
            }
            Command::Exit => {
                println!("{}", "안녕히 가세요!".green());
                return Ok(false);
            }
            Command::Unknown { input } => {
                println!("{}", format!("알 수 없는 명령입니다: {}", input).red());
                println!("{} 로 명령 목록을 확인하세요", "/help".cyan());
            }
        }
        Ok(true)
    }

    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/help, /h", "Show this help message"),
            ("/history [n]", "Show last n questions (default: 10)"),
            ("/articles", "Show primary articles seen this session"),
            ("/stats", "Show category, date and search statistics"),
            ("/reset", "Clear the conversation (search history is kept)"),
            ("/clear, /cls", "Clear screen"),
            ("/exit, exit, quit", "Exit REPL"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<20} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - Ask about the news directly (no / prefix)");
        println!("  - Use {} for input history", "UP/DOWN arrows".cyan());
        println!("  - Press {} or {} to exit", "Ctrl-D".cyan(), "/exit".cyan());
        println!();
    }

    fn show_history(&self, session: &ChatSession, limit: usize) {
        let turns = session.recent_turns(limit);

        if turns.is_empty() {
            println!("{}", "아직 대화 기록이 없습니다.".yellow());
            return;
        }

        println!("\n{}", format!("대화 기록 (최근 {}건):", turns.len()).bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        for (i, turn) in turns.iter().enumerate() {
            let index = turns.len() - i;
            let mode = turn.mode.map(|m| m.as_str()).unwrap_or("error");
            println!(
                "  {}. {} {}",
                index.to_string().cyan(),
                turn.query,
                format!("[{}, {} articles]", mode, turn.articles.len()).dimmed()
            );
        }
        println!();
    }

    fn show_articles(&self, session: &ChatSession) {
        let articles = session.article_history();

        if articles.is_empty() {
            println!("{}", "아직 검색된 기사가 없습니다.".yellow());
            return;
        }

        println!("\n{}", format!("검색된 기사 ({}건):", articles.len()).bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        for (i, article) in articles.iter().enumerate() {
            println!("  {}. {}", (i + 1).to_string().cyan(), article.title.bold());
            println!(
                "     {} | {} | {}",
                article.published_or_placeholder().dimmed(),
                article.categories_label(),
                article.url.blue()
            );
        }
        println!();
    }

    fn show_stats(&self, stats: &SessionStats) {
        if !stats.has_articles() {
            println!("{}", "아직 검색 결과가 없습니다. 질문을 입력해주세요!".yellow());
            return;
        }

        println!("\n{}", "검색 분석".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        println!("{}", "카테고리별 기사 분포:".bold());
        for (category, count) in &stats.categories {
            println!(
                "  - {}: {:.1}% ({}건)",
                category,
                stats.category_percentage(*count),
                count
            );
        }

        println!("{}", "날짜별 기사 수:".bold());
        if stats.dates.is_empty() {
            println!("  {}", "아직 날짜 데이터가 없습니다.".dimmed());
        }
        for (date, count) in &stats.dates {
            println!("  - {}: {}건", date.format("%Y-%m-%d"), count);
        }

        println!("{}", "검색 통계:".bold());
        println!("  총 검색 수:        {}", stats.total_searches.to_string().green());
        println!("  검색된 총 기사 수: {}", stats.total_articles.to_string().green());
        if let Some(latest) = stats.latest_date {
            println!("  최신 기사 날짜:    {}", latest.format("%Y-%m-%d").to_string().green());
        }

        if !stats.recent_searches.is_empty() {
            println!("{}", "최근 검색어:".bold());
            for query in &stats.recent_searches {
                println!("  • {}", query);
            }
        }
        println!();
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if input is a command (starts with / or is a bare exit word)
pub fn is_command(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.starts_with('/') || is_exit_word(trimmed)
}

fn is_exit_word(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit")
}
