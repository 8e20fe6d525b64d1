//! # Context Engine
//!
//! Picks the smallest, highest-value set of repository files for a free-text task
//! and renders them as one LLM-ready block.
//!
//! ## Pipeline
//!
//! ```text
//! (repo, prompt)
//!     │
//!     ├──> Result cache (path + prompt prefix + sampled mtime, TTL)
//!     │      └─ hit ──> ContextResult
//!     │
//!     ├──> Scanner ──> FileRecord[]
//!     ├──> Keywords + relationship map
//!     ├──> Relevance scoring (stable descending sort)
//!     ├──> Budgeted greedy selection
//!     ├──> Content loading (character cap, lenient decoding)
//!     └──> Structure summary + config digest ──> ContextResult ──> cache
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use context_engine::{format_for_llm, ContextEngine};
//!
//! let engine = ContextEngine::from_env();
//! let context = engine.collect("/path/to/repo", "fix the login validation bug");
//! println!("{}", format_for_llm(&context));
//! ```

mod cache;
mod clock;
mod config;
mod engine;
mod error;
mod format;
mod loader;
mod result;

pub use cache::{cache_key, repo_fingerprint, ResultCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    EngineConfig, ENV_CACHE_TTL, ENV_DEPTH, ENV_MAX_FILES, ENV_MAX_FILE_SIZE, ENV_MAX_TOKENS,
};
pub use engine::{fallback_context, ContextEngine, FALLBACK_HEADER, UNANALYZABLE_STRUCTURE};
pub use error::{EngineError, Result};
pub use format::{
    config_digest, format_for_llm, structure_summary, STRUCTURE_HEADER, TRUNCATION_NOTICE,
};
pub use loader::{estimate_tokens, ContentLoader, FailedRead, LoadOutcome};
pub use result::{ContextResult, RankedFile, Ranking};
