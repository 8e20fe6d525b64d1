use crate::clock::Clock;
use crate::result::ContextResult;
use blake3::Hasher;
use context_indexer::is_ignored_dir_name;
use ignore::WalkBuilder;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, UNIX_EPOCH};

/// Characters of the prompt that participate in the cache key
pub const PROMPT_KEY_CHARS: usize = 100;

/// Files per directory whose mtime feeds the fingerprint
pub const FINGERPRINT_SAMPLE_PER_DIR: usize = 10;

/// Stable key over the repository path, the prompt prefix and the fingerprint
pub fn cache_key(repo: &Path, prompt: &str, fingerprint_ms: u64) -> String {
    let prompt_prefix: String = prompt.chars().take(PROMPT_KEY_CHARS).collect();

    let mut hasher = Hasher::new();
    hasher.update(repo.to_string_lossy().as_bytes());
    hasher.update(b"|");
    hasher.update(prompt_prefix.as_bytes());
    hasher.update(format!("|{fingerprint_ms}").as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Latest modification time (Unix ms) over a sample of the tree: the first few files
/// of every directory the scanner would visit.
///
/// A cheap mutation signal, not a content hash: edits to unsampled files go unnoticed
/// until the entry expires.
pub fn repo_fingerprint(root: &Path, max_depth: usize) -> u64 {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(max_depth.saturating_add(1)))
        .sort_by_file_name(|a, b| a.cmp(b));
    builder.filter_entry(|entry| {
        entry.depth() == 0
            || !entry.file_type().is_some_and(|ft| ft.is_dir())
            || !entry.file_name().to_str().is_some_and(is_ignored_dir_name)
    });

    let mut sampled: HashMap<PathBuf, usize> = HashMap::new();
    let mut latest = 0u64;
    for entry in builder.build().filter_map(|entry| entry.ok()) {
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        // links count like the files they resolve to, matching the scanner
        let meta = if file_type.is_symlink() {
            std::fs::metadata(entry.path()).ok()
        } else if file_type.is_file() {
            entry.metadata().ok()
        } else {
            continue;
        };
        let Some(meta) = meta.filter(|meta| meta.is_file()) else {
            continue;
        };
        let parent = entry.path().parent().map(Path::to_path_buf).unwrap_or_default();
        let seen = sampled.entry(parent).or_insert(0);
        if *seen >= FINGERPRINT_SAMPLE_PER_DIR {
            continue;
        }
        *seen += 1;

        let modified_ms = meta
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        latest = latest.max(modified_ms);
    }
    latest
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: ContextResult,
    created_ms: u64,
}

struct MemCache {
    map: HashMap<String, CacheEntry>,
    /// Newest first
    order: VecDeque<String>,
}

impl MemCache {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_front(key.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    fn insert(&mut self, key: &str, entry: CacheEntry, capacity: usize) {
        self.map.insert(key.to_string(), entry);
        self.touch(key);
        while self.order.len() > capacity {
            if let Some(old) = self.order.pop_back() {
                self.map.remove(&old);
            }
        }
    }
}

/// In-memory TTL cache of context results, bounded to the most recently created
/// entries.
///
/// Time comes from the injected [`Clock`], so expiry is testable without sleeping.
pub struct ResultCache {
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
    inner: Mutex<MemCache>,
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            capacity,
            clock,
            inner: Mutex::new(MemCache::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached result for `key`, or `None` when absent or expired (expired entries
    /// are dropped on the way out)
    pub fn get(&self, key: &str) -> Option<ContextResult> {
        let mut cache = self.lock();
        let created_ms = cache.map.get(key)?.created_ms;

        let ttl_ms = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        if self.clock.now_ms().saturating_sub(created_ms) > ttl_ms {
            cache.remove(key);
            return None;
        }
        cache.map.get(key).map(|entry| entry.result.clone())
    }

    /// Store `result`, evicting the oldest entries beyond capacity
    pub fn put(&self, key: &str, result: ContextResult) {
        let entry = CacheEntry {
            result,
            created_ms: self.clock.now_ms(),
        };
        self.lock().insert(key, entry, self.capacity);
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
