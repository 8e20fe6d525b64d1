use crate::catalog::{is_config_file, Language};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// One on-disk file considered for context selection.
///
/// Identity and metadata are fixed by the scanner. `score` is assigned once by the
/// scorer; `content` and `tokens_estimate` are set once by the content loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path on disk
    pub path: PathBuf,

    /// Slash-separated path relative to the repository root (canonical key)
    pub relative_path: String,

    /// Size in bytes at scan time
    pub size: u64,

    /// Lower-cased extension without the dot (empty when absent)
    pub extension: String,

    pub language: Language,

    /// Last modification, Unix milliseconds
    pub modified_ms: u64,

    #[serde(default)]
    pub score: f64,

    #[serde(default)]
    pub tokens_estimate: usize,

    #[serde(default)]
    pub content: String,
}

impl FileRecord {
    pub fn new(path: PathBuf, relative_path: String, size: u64, modified_ms: u64) -> Self {
        let extension = Path::new(&relative_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let language = Language::from_extension(&extension);

        Self {
            path,
            relative_path,
            size,
            extension,
            language,
            modified_ms,
            score: 0.0,
            tokens_estimate: 0,
            content: String::new(),
        }
    }

    /// Last path segment of the relative path
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Number of slash-separated segments (a root-level file has depth 1)
    pub fn depth(&self) -> usize {
        self.relative_path.split('/').count()
    }

    pub fn is_config(&self) -> bool {
        is_config_file(self.file_name())
    }
}

/// Render `path` relative to `root` with `/` separators, or `None` when it is not below `root`
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derives_extension_and_language() {
        let record = FileRecord::new(
            PathBuf::from("/repo/src/App.TSX"),
            "src/App.TSX".to_string(),
            120,
            0,
        );
        assert_eq!(record.extension, "tsx");
        assert_eq!(record.language, Language::TypeScript);
        assert_eq!(record.file_name(), "App.TSX");
        assert_eq!(record.depth(), 2);
        assert_eq!(record.score, 0.0);
        assert!(record.content.is_empty());
    }

    #[test]
    fn dotfiles_have_no_extension() {
        let record = FileRecord::new(
            PathBuf::from("/repo/.gitignore"),
            ".gitignore".to_string(),
            10,
            0,
        );
        assert_eq!(record.extension, "");
        assert_eq!(record.language, Language::Text);
        assert!(record.is_config());
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_slash_path(root, &root.join("a").join("b.py")),
            Some("a/b.py".to_string())
        );
        assert_eq!(relative_slash_path(root, root), None);
        assert_eq!(relative_slash_path(root, Path::new("/other/x.py")), None);
    }
}
