use context_indexer::ScanOptions;
use std::time::Duration;

pub const ENV_MAX_TOKENS: &str = "REPO_CONTEXT_MAX_TOKENS";
pub const ENV_MAX_FILES: &str = "REPO_CONTEXT_MAX_FILES";
pub const ENV_MAX_FILE_SIZE: &str = "REPO_CONTEXT_MAX_FILE_SIZE";
pub const ENV_DEPTH: &str = "REPO_CONTEXT_DEPTH";
pub const ENV_CACHE_TTL: &str = "REPO_CONTEXT_CACHE_TTL";

const DEFAULT_MAX_TOKENS: usize = 15_000;
const DEFAULT_MAX_FILES: usize = 20;
const DEFAULT_MAX_FILE_CHARS: usize = 10_000;
const DEFAULT_MAX_DEPTH: usize = 3;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Engine limits and cache policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Token budget for the selection
    pub max_tokens: usize,

    pub max_files: usize,

    /// Characters read per selected file
    pub max_file_chars: usize,

    /// Directory levels below the root that are scanned
    pub max_depth: usize,

    pub cache_ttl: Duration,

    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            max_files: DEFAULT_MAX_FILES,
            max_file_chars: DEFAULT_MAX_FILE_CHARS,
            max_depth: DEFAULT_MAX_DEPTH,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Read the `REPO_CONTEXT_*` environment knobs over the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`] with an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let ttl_secs = parse_knob(lookup(ENV_CACHE_TTL).as_deref(), DEFAULT_CACHE_TTL_SECS, 0);
        Self {
            max_tokens: parse_knob(lookup(ENV_MAX_TOKENS).as_deref(), defaults.max_tokens, 1),
            max_files: parse_knob(lookup(ENV_MAX_FILES).as_deref(), defaults.max_files, 1),
            max_file_chars: parse_knob(
                lookup(ENV_MAX_FILE_SIZE).as_deref(),
                defaults.max_file_chars,
                1,
            ),
            max_depth: parse_knob(lookup(ENV_DEPTH).as_deref(), defaults.max_depth, 0),
            cache_ttl: Duration::from_secs(ttl_secs),
            cache_capacity: defaults.cache_capacity,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::for_char_budget(self.max_depth, self.max_file_chars)
    }
}

/// Blank or unparsable values fall back to `default_value`; parsed values are
/// raised to `min`.
fn parse_knob<T>(raw: Option<&str>, default_value: T, min: T) -> T
where
    T: std::str::FromStr + Ord,
{
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default_value)
        .max(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn parse_knob_defaults_and_clamps() {
        assert_eq!(parse_knob::<usize>(None, 20, 1), 20);
        assert_eq!(parse_knob::<usize>(Some(""), 20, 1), 20);
        assert_eq!(parse_knob::<usize>(Some("   "), 20, 1), 20);
        assert_eq!(parse_knob::<usize>(Some("abc"), 20, 1), 20);
        assert_eq!(parse_knob::<usize>(Some("-3"), 20, 1), 20);
        assert_eq!(parse_knob::<usize>(Some(" 5 "), 20, 1), 5);
        assert_eq!(parse_knob::<usize>(Some("0"), 20, 1), 1);
        assert_eq!(parse_knob::<usize>(Some("0"), 3, 0), 0);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_MAX_TOKENS, "500"),
            (ENV_MAX_FILES, "4"),
            (ENV_DEPTH, "0"),
            (ENV_CACHE_TTL, "bogus"),
        ]);
        let config = EngineConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(
            config,
            EngineConfig {
                max_tokens: 500,
                max_files: 4,
                max_file_chars: 10_000,
                max_depth: 0,
                cache_ttl: Duration::from_secs(300),
                cache_capacity: 10,
            }
        );
    }

    #[test]
    fn empty_lookup_is_default() {
        assert_eq!(EngineConfig::from_lookup(|_| None), EngineConfig::default());
    }
}
