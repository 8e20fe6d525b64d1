use crate::cache::{cache_key, repo_fingerprint, ResultCache};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::format::{config_digest, structure_summary};
use crate::loader::ContentLoader;
use crate::result::{ContextResult, RankedFile, Ranking};
use context_graph::{GraphBuilder, RelationshipMap};
use context_indexer::{relative_slash_path, FileRecord, FileScanner};
use context_search::{BudgetSelector, KeywordExtractor, RelevanceScorer, Selection};
use ignore::WalkBuilder;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

const FALLBACK_FILES_PER_DIR: usize = 5;
const FALLBACK_MAX_FILES: usize = 5;
const FALLBACK_LISTED_PATHS: usize = 10;

pub const FALLBACK_HEADER: &str = "Basic repository structure:";
pub const UNANALYZABLE_STRUCTURE: &str = "Could not analyze repository structure";

/// Everything the pipeline knows before content is loaded
struct Analysis {
    keywords: Vec<String>,
    ranked: Vec<FileRecord>,
    relationships: RelationshipMap,
    selection: Selection,
}

/// Repository context selection: scan, score, select, load and format, with a
/// result cache in front.
pub struct ContextEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    cache: ResultCache,
}

impl ContextEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Engine configured from the `REPO_CONTEXT_*` environment variables
    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    /// The clock drives both cache expiry and recency scoring
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = ResultCache::new(config.cache_ttl, config.cache_capacity, clock.clone());
        Self {
            config,
            clock,
            cache,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Build (or reuse) the context bundle for `prompt` over the repository at `repo`.
    ///
    /// Never fails: pipeline errors degrade to a shallow fallback listing, or to an
    /// empty result when the repository cannot be read at all.
    pub fn collect(&self, repo: impl AsRef<Path>, prompt: &str) -> ContextResult {
        let root = repo.as_ref();
        let started = Instant::now();
        log::info!("Starting context collection for {}", root.display());

        let key = cache_key(root, prompt, repo_fingerprint(root, self.config.max_depth));
        if let Some(cached) = self.cache.get(&key) {
            log::info!("Using cached context for {}", root.display());
            return cached;
        }

        match self.compute(root, prompt) {
            Ok(result) => {
                log::info!(
                    "Context collection completed in {:.2}s: {} files, ~{} tokens",
                    started.elapsed().as_secs_f64(),
                    result.total_files,
                    result.total_tokens
                );
                self.cache.put(&key, result.clone());
                result
            }
            Err(e) => {
                log::error!("Error collecting context for {}: {e}", root.display());
                fallback_context(root)
            }
        }
    }

    /// Scores and the would-be selection, without reading content or using the cache
    pub fn rank(&self, repo: impl AsRef<Path>, prompt: &str) -> Result<Ranking> {
        let analysis = self.analyze(repo.as_ref(), prompt)?;
        let selector = self.selector();
        let selected: HashSet<&str> = analysis
            .selection
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();

        let candidates = analysis
            .ranked
            .iter()
            .map(|file| RankedFile {
                relative_path: file.relative_path.clone(),
                score: file.score,
                fan_in: analysis.relationships.fan_in(&file.relative_path),
                estimated_tokens: selector.estimate_tokens(file),
                selected: selected.contains(file.relative_path.as_str()),
            })
            .collect();

        Ok(Ranking {
            keywords: analysis.keywords,
            candidates,
            estimated_tokens: analysis.selection.estimated_tokens,
        })
    }

    fn selector(&self) -> BudgetSelector {
        BudgetSelector::new(
            self.config.max_tokens,
            self.config.max_files,
            self.config.max_file_chars,
        )
    }

    fn analyze(&self, root: &Path, prompt: &str) -> Result<Analysis> {
        let scan = FileScanner::with_options(root, self.config.scan_options()).scan()?;

        let keywords = KeywordExtractor::new().extract(prompt);
        log::debug!(
            "Extracted prompt keywords: {:?}",
            keywords.iter().take(5).collect::<Vec<_>>()
        );

        let relationships = GraphBuilder::new().build(&scan.records);
        let ranked =
            RelevanceScorer::new(self.clock.now_ms()).rank(scan.records, &keywords, &relationships);
        let selection = self.selector().select(&ranked);

        Ok(Analysis {
            keywords,
            ranked,
            relationships,
            selection,
        })
    }

    fn compute(&self, root: &Path, prompt: &str) -> Result<ContextResult> {
        let analysis = self.analyze(root, prompt)?;
        let candidates = analysis.ranked.len();

        let structure = structure_summary(&analysis.selection.files);
        let loaded = ContentLoader::new(self.config.max_file_chars).load(analysis.selection.files);
        let config_info = config_digest(root);

        let total_tokens = loaded.total_tokens();
        let total_files = loaded.files.len();
        Ok(ContextResult {
            files: loaded.files,
            total_tokens,
            total_files,
            truncated: candidates > total_files,
            structure,
            config_info,
        })
    }
}

/// Shallow, unscored listing used when the full pipeline fails
pub fn fallback_context(root: &Path) -> ContextResult {
    match fallback_listing(root) {
        Ok(paths) => {
            let structure = std::iter::once(FALLBACK_HEADER.to_string())
                .chain(paths.iter().take(FALLBACK_LISTED_PATHS).cloned())
                .collect::<Vec<_>>()
                .join("\n");
            let files: Vec<FileRecord> = paths
                .into_iter()
                .take(FALLBACK_MAX_FILES)
                .map(|relative_path| {
                    let mut file =
                        FileRecord::new(root.join(&relative_path), relative_path, 0, 0);
                    file.score = 1.0;
                    file
                })
                .collect();

            ContextResult {
                total_files: files.len(),
                files,
                total_tokens: 0,
                truncated: true,
                structure,
                config_info: String::new(),
            }
        }
        Err(e) => {
            log::error!("Even fallback context failed for {}: {e}", root.display());
            ContextResult::empty(UNANALYZABLE_STRUCTURE)
        }
    }
}

/// First few visible files of each visible directory, in walk order
fn fallback_listing(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(EngineError::InvalidPath(root.display().to_string()));
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    builder.filter_entry(|entry| {
        entry.depth() == 0
            || !entry.file_type().is_some_and(|ft| ft.is_dir())
            || !entry.file_name().to_string_lossy().starts_with('.')
    });

    let mut per_dir: HashMap<std::path::PathBuf, usize> = HashMap::new();
    let mut paths = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Fallback walk error: {e}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file())
            || entry.file_name().to_string_lossy().starts_with('.')
        {
            continue;
        }
        let parent = entry.path().parent().map(Path::to_path_buf).unwrap_or_default();
        let taken = per_dir.entry(parent).or_insert(0);
        if *taken >= FALLBACK_FILES_PER_DIR {
            continue;
        }
        *taken += 1;

        if let Some(relative_path) = relative_slash_path(root, entry.path()) {
            paths.push(relative_path);
        }
        if paths.len() >= FALLBACK_LISTED_PATHS {
            break;
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn fallback_lists_visible_files() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();
        fs::write(root.join("README.md"), "# x").unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();

        let result = fallback_context(root);

        let paths: Vec<&str> = result.files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "src/lib.rs"]);
        assert_eq!(result.total_files, 2);
        assert_eq!(result.total_tokens, 0);
        assert!(result.truncated);
        assert_eq!(result.structure, "Basic repository structure:\nREADME.md\nsrc/lib.rs");
        assert!(result.files.iter().all(|f| f.score == 1.0 && f.content.is_empty()));
    }

    #[test]
    fn fallback_caps_files_per_directory_and_overall() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b")).unwrap();
        for i in 0..8 {
            fs::write(root.join(format!("a{i}.txt")), "").unwrap();
            fs::write(root.join("b").join(format!("f{i}.txt")), "").unwrap();
        }

        let result = fallback_context(root);

        assert_eq!(result.files.len(), 5);
        let listed: Vec<&str> = result.structure.lines().skip(1).collect();
        assert_eq!(
            listed,
            vec![
                "a0.txt", "a1.txt", "a2.txt", "a3.txt", "a4.txt", "b/f0.txt", "b/f1.txt",
                "b/f2.txt", "b/f3.txt", "b/f4.txt",
            ]
        );
    }

    #[test]
    fn missing_repository_yields_empty_result() {
        let temp = tempdir().unwrap();
        let result = fallback_context(&temp.path().join("missing"));
        assert_eq!(result, ContextResult::empty(UNANALYZABLE_STRUCTURE));
    }
}
