use context_indexer::{read_prefix, FileRecord};
use std::path::PathBuf;

const CHARS_PER_TOKEN: usize = 3;

#[derive(Debug)]
pub struct FailedRead {
    pub path: PathBuf,
    pub error: std::io::Error,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Selected files that were read, in selection order
    pub files: Vec<FileRecord>,
    pub failed: Vec<FailedRead>,
}

impl LoadOutcome {
    pub fn total_tokens(&self) -> usize {
        self.files.iter().map(|f| f.tokens_estimate).sum()
    }
}

/// Reads selected files up to a character cap
pub struct ContentLoader {
    max_chars: usize,
}

impl ContentLoader {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Fill `content` and `tokens_estimate` for every readable file; unreadable
    /// ones are dropped from the result and reported in `failed`.
    pub fn load(&self, selected: Vec<FileRecord>) -> LoadOutcome {
        let mut outcome = LoadOutcome::default();
        for mut file in selected {
            match read_prefix(&file.path, self.max_chars) {
                Ok(content) => {
                    file.tokens_estimate = estimate_tokens(&content);
                    file.content = content;
                    outcome.files.push(file);
                }
                Err(error) => {
                    log::warn!("Could not read file {}: {error}", file.path.display());
                    outcome.failed.push(FailedRead {
                        path: file.path,
                        error,
                    });
                }
            }
        }
        outcome
    }
}

/// Post-read estimate: one token per three characters
pub fn estimate_tokens(content: &str) -> usize {
    content.chars().count() / CHARS_PER_TOKEN
}
