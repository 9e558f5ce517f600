//! Query pipeline
//!
//! keyword search -> relevance selection -> intent analysis + drafting -> review.
//!
//! Components:
//! - Prompts: the five prompt shapes sent to the model
//! - Selector: primary/secondary split and drafting-mode routing
//! - Drafter: intent analysis and mode-specific drafting
//! - Reviewer: accept-or-replace critique of the draft
//! - Chatbot: per-query orchestration with apology fallback

pub mod prompts;
pub mod selector;
pub mod drafter;
pub mod reviewer;
pub mod chatbot;

// Re-export key types
pub use selector::{RelevanceSelector, Selection};
pub use drafter::{Draft, ResponseDrafter};
pub use reviewer::{ResponseReviewer, ReviewVerdict};
pub use chatbot::NewsChatbot;
