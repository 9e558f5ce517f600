//! NewsBuddy - Question answering over a crawled news corpus
//!
//! A question goes through keyword search against an Elasticsearch article
//! index, relevance-gated selection, intent analysis and drafting with a
//! generative model, and a final self-review pass.
//!
//! # Architecture
//!
//! - **search**: keyword extraction, query building, hit parsing, index sync
//! - **llm**: generative model boundary (Gemini, Ollama)
//! - **pipeline**: selection, drafting, review, orchestration
//! - **repl** / **doctor** / **cli**: terminal front end

pub mod errors;
pub mod types;
pub mod logging;
pub mod cli;
pub mod search;
pub mod llm;
pub mod pipeline;
pub mod repl;
pub mod doctor;

// Re-export commonly used types
pub use errors::{ChatError, Result};
pub use pipeline::NewsChatbot;
pub use types::{Article, DraftMode, PipelineResult};
