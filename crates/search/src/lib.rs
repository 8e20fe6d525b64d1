//! # Context Search
//!
//! Turns a free-text prompt and a scanned repository into a ranked, budgeted
//! file selection.
//!
//! ```text
//! prompt ──> KeywordExtractor ──┐
//!                               ├──> RelevanceScorer ──> BudgetSelector ──> Selection
//! FileRecord[] + RelationshipMap┘
//! ```

mod keywords;
mod scoring;
mod selection;

pub use keywords::{KeywordExtractor, MAX_KEYWORDS};
pub use scoring::RelevanceScorer;
pub use selection::{BudgetSelector, Selection, RELEVANCE_FLOOR};
