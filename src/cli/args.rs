//! Command-line argument parsing for NewsBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::config::Config;

/// NewsBuddy - Ask questions about crawled news articles
#[derive(Parser, Debug)]
#[command(name = "newsbuddy")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Answer questions from a crawled news corpus with a reviewed LLM pipeline", long_about = None)]
pub struct Args {
    /// Question to answer once (starts the interactive chat when omitted)
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Elasticsearch base URL (overrides config)
    #[arg(long)]
    pub es_url: Option<String>,

    /// Article index name (overrides config)
    #[arg(long)]
    pub index: Option<String>,

    /// Model provider: gemini or ollama (overrides config)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name for the selected provider (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except the answer)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive chat mode
    Start,

    /// Create the article index and sync crawler records into it
    Index {
        /// JSON-lines dump of crawled articles
        #[arg(long)]
        file: PathBuf,

        /// Drop and recreate the index before syncing
        #[arg(long)]
        recreate: bool,
    },

    /// Check search index and model provider health
    Doctor,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// A question and a subcommand are mutually exclusive
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.question.is_some() {
            return Err("Cannot specify a question with a subcommand.".to_string());
        }

        if let Some(question) = &self.question {
            if question.trim().is_empty() {
                return Err("Question must not be empty.".to_string());
            }
        }

        Ok(())
    }

    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.es_url {
            config.search.url = url.clone();
        }
        if let Some(index) = &self.index {
            config.search.index = index.clone();
        }
        if let Some(provider) = &self.provider {
            config.model.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            match config.model.provider.as_str() {
                "ollama" => config.model.ollama_model = model.clone(),
                _ => config.model.gemini_model = model.clone(),
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Check if should show the pipeline spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show article cards after answers
    pub fn show_articles(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["newsbuddy", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["newsbuddy"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["newsbuddy", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["newsbuddy", "-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_question_positional() {
        let args = parse(&["newsbuddy", "AI 기술 동향"]);
        assert_eq!(args.question.as_deref(), Some("AI 기술 동향"));
        assert!(args.command.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_index_subcommand() {
        let args = parse(&["newsbuddy", "index", "--file", "articles.jsonl", "--recreate"]);
        assert_eq!(
            args.command,
            Some(Commands::Index {
                file: PathBuf::from("articles.jsonl"),
                recreate: true,
            })
        );
    }

    #[test]
    fn test_validate_no_question_or_command_is_chat() {
        let args = parse(&["newsbuddy"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_fail_empty_question() {
        let args = Args {
            question: Some("   ".to_string()),
            es_url: None,
            index: None,
            provider: None,
            model: None,
            config: None,
            verbose: 0,
            quiet: false,
            command: None,
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_fail_both_question_and_command() {
        let args = Args {
            question: Some("test".to_string()),
            es_url: None,
            index: None,
            provider: None,
            model: None,
            config: None,
            verbose: 0,
            quiet: false,
            command: Some(Commands::Doctor),
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "newsbuddy",
            "--es-url",
            "http://es:9200",
            "--index",
            "tech",
            "--provider",
            "ollama",
            "--model",
            "llama3.1:8b",
        ]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.search.url, "http://es:9200");
        assert_eq!(config.search.index, "tech");
        assert_eq!(config.model.provider, "ollama");
        assert_eq!(config.model.ollama_model, "llama3.1:8b");
        assert_eq!(config.model.gemini_model, Config::default().model.gemini_model);
    }

    #[test]
    fn test_verbosity_methods() {
        assert!(!Verbosity::Quiet.show_progress());
        assert!(Verbosity::Normal.show_progress());
        assert!(!Verbosity::Quiet.show_articles());
        assert_eq!(Verbosity::VeryVerbose.as_str(), "very_verbose");
    }
}
