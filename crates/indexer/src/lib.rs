//! # Context Indexer
//!
//! Repository scanning for context selection.
//!
//! ## Pipeline
//!
//! ```text
//! Repository root
//!     │
//!     ├──> File Scanner (ignore rules, depth limit, size ceiling)
//!     │      └─> FileRecord[] (metadata only, no content)
//!     │
//!     └──> Capped reads (lenient UTF-8, character limit)
//!            └─> Content for later pipeline stages
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use context_indexer::{FileScanner, ScanOptions};
//!
//! fn main() -> context_indexer::Result<()> {
//!     let scanner = FileScanner::with_options("/path/to/project", ScanOptions::default());
//!     let outcome = scanner.scan()?;
//!
//!     println!("Found {} files ({} skipped)", outcome.records.len(), outcome.skipped.len());
//!     Ok(())
//! }
//! ```

mod catalog;
mod error;
mod read;
mod record;
mod scanner;

pub use catalog::{
    is_config_file, is_entry_point, Language, CONFIG_FILE_NAMES, ENTRY_POINT_NAMES,
};
pub use error::{IndexerError, Result};
pub use read::read_prefix;
pub use record::{relative_slash_path, FileRecord};
pub use scanner::{
    is_ignored_dir_name, FileScanner, ScanOptions, ScanOutcome, SkipReason, SkippedFile,
};
