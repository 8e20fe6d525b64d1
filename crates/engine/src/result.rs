use context_indexer::FileRecord;
use serde::{Deserialize, Serialize};

/// Context bundle for one (repository, prompt) request.
///
/// Built once, either freshly or from the cache, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextResult {
    /// Loaded files, descending score, scan order on ties
    pub files: Vec<FileRecord>,

    /// Sum of the files' post-load token estimates
    pub total_tokens: usize,

    pub total_files: usize,

    /// More candidates were scored than ended up in `files`
    pub truncated: bool,

    pub structure: String,

    pub config_info: String,
}

impl ContextResult {
    pub fn empty(structure: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            total_tokens: 0,
            total_files: 0,
            truncated: false,
            structure: structure.into(),
            config_info: String::new(),
        }
    }
}

/// One scored candidate in a [`Ranking`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFile {
    pub relative_path: String,
    pub score: f64,
    pub fan_in: usize,
    pub estimated_tokens: usize,
    pub selected: bool,
}

/// Scoring breakdown for a request, without loaded content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub keywords: Vec<String>,
    pub candidates: Vec<RankedFile>,
    pub estimated_tokens: usize,
}

impl Ranking {
    pub fn selected(&self) -> impl Iterator<Item = &RankedFile> {
        self.candidates.iter().filter(|c| c.selected)
    }
}
