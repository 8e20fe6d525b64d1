use crate::error::{IndexerError, Result};
use crate::record::{relative_slash_path, FileRecord};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Scanner limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory levels below the root whose files are still collected (0 = root only)
    pub max_depth: usize,

    /// Files larger than this many bytes are skipped before any read
    pub max_file_bytes: u64,
}

impl ScanOptions {
    /// Size ceiling is a fixed multiple of the per-file character budget, since the
    /// character count is unknown until the file is read.
    pub fn for_char_budget(max_depth: usize, max_file_chars: usize) -> Self {
        Self {
            max_depth,
            max_file_bytes: (max_file_chars as u64).saturating_mul(SIZE_CEILING_FACTOR),
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::for_char_budget(3, 10_000)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("file too large ({size} bytes > {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error("cannot stat file: {0}")]
    Metadata(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Records in walk order plus everything that was dropped along the way
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
    pub walk_errors: usize,

    /// Entries yielded by the walk, root included; pruned directories add nothing
    pub entries_visited: usize,
}

/// Depth-limited scanner for candidate files in a repository
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_options(root, ScanOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    /// Walk the tree and collect metadata for every non-ignored regular file.
    ///
    /// Symlinks are kept when they resolve to a regular file; the record carries the
    /// target's size and mtime. A link that cannot be resolved is skipped as a
    /// metadata failure.
    ///
    /// Ignored and too-deep directories are pruned, never descended into. Entries
    /// are visited in file-name order so repeated scans yield the same sequence.
    pub fn scan(&self) -> Result<ScanOutcome> {
        if !self.root.is_dir() {
            return Err(IndexerError::InvalidPath(self.root.display().to_string()));
        }

        let mut outcome = ScanOutcome::default();
        for result in self.walker().build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    outcome.walk_errors += 1;
                    continue;
                }
            };
            outcome.entries_visited += 1;
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() && !file_type.is_symlink() {
                continue;
            }

            let path = entry.path();
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if is_ignored_file_name(name) {
                log::debug!("Skipping ignored file {}", path.display());
                continue;
            }
            let Some(relative_path) = relative_slash_path(&self.root, path) else {
                continue;
            };

            let meta = if file_type.is_symlink() {
                std::fs::metadata(path).map_err(|e| e.to_string())
            } else {
                entry.metadata().map_err(|e| e.to_string())
            };
            let meta = match meta {
                Ok(meta) => meta,
                Err(e) => {
                    log::warn!("Could not access file {}: {e}", path.display());
                    outcome.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason: SkipReason::Metadata(e),
                    });
                    continue;
                }
            };
            if !meta.is_file() {
                log::debug!("Skipping link to non-file {}", path.display());
                continue;
            }
            if meta.len() > self.options.max_file_bytes {
                log::debug!(
                    "Skipping large file {} ({} bytes > {})",
                    path.display(),
                    meta.len(),
                    self.options.max_file_bytes
                );
                outcome.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::TooLarge {
                        size: meta.len(),
                        limit: self.options.max_file_bytes,
                    },
                });
                continue;
            }

            let modified_ms = meta
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

            outcome.records.push(FileRecord::new(
                path.to_path_buf(),
                relative_path,
                meta.len(),
                modified_ms,
            ));
        }

        log::info!(
            "Found {} candidate files under {} ({} skipped)",
            outcome.records.len(),
            self.root.display(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    fn walker(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false) // ignore rules are fixed, not read from the repo
            .follow_links(false)
            // files sit one level below the deepest collected directory
            .max_depth(Some(self.options.max_depth.saturating_add(1)))
            .sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(|entry| !Self::is_pruned_dir(entry));
        builder
    }

    fn is_pruned_dir(entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        is_dir
            && entry
                .file_name()
                .to_str()
                .is_some_and(is_ignored_dir_name)
    }
}

/// Hidden directories and well-known build/dependency/VCS directories
pub fn is_ignored_dir_name(name: &str) -> bool {
    name.starts_with('.') || IGNORED_DIRS.contains(&name)
}

fn is_ignored_file_name(name: &str) -> bool {
    if name.starts_with('.') && !VISIBLE_DOTFILES.contains(&name) {
        return true;
    }
    IGNORED_FILE_GLOBS.is_match(name)
}

const SIZE_CEILING_FACTOR: u64 = 4;

const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "__pycache__",
    ".git",
    "target",
    "build",
    "dist",
    ".next",
    ".nuxt",
    "coverage",
    ".pytest_cache",
    ".mypy_cache",
    "vendor",
    "venv",
    "env",
    ".venv",
    ".env",
    "htmlcov",
];

const VISIBLE_DOTFILES: &[&str] = &[".gitignore", ".env.example"];

const IGNORED_FILE_PATTERNS: &[&str] = &[
    "*.log", "*.tmp", "*.cache", "*.lock", "*.pyc", "*.pyo", "*.class", "*.o", "*.so",
    "*.dylib", "*.dll", "*.exe",
];

static IGNORED_FILE_GLOBS: Lazy<GlobSet> = Lazy::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in IGNORED_FILE_PATTERNS {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => log::warn!("Invalid ignore pattern {pattern}: {e}"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("Failed to build ignore patterns: {e}");
        GlobSet::empty()
    })
});
