//! Type definitions module
//!
//! Articles coming out of the search layer and the result handed back to callers.

pub mod article;
pub mod result;

// Re-export commonly used types
pub use article::{Article, Highlights, NO_DATE_INFO, UNCATEGORIZED};
pub use result::{DraftMode, PipelineResult, APOLOGY_ANSWER};
