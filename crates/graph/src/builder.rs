use crate::references::extract_references;
use crate::types::RelationshipMap;
use context_indexer::{read_prefix, FileRecord};

/// Characters read from the head of each file when looking for imports
pub const REFERENCE_SCAN_CHARS: usize = 2000;

/// Build a [`RelationshipMap`] from scanned files
pub struct GraphBuilder {
    scan_chars: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            scan_chars: REFERENCE_SCAN_CHARS,
        }
    }

    /// Read the head of every code file, extract its references and resolve each one
    /// to the first other scanned file it matches.
    ///
    /// Unreadable files are logged and contribute no edges.
    pub fn build(&self, files: &[FileRecord]) -> RelationshipMap {
        let mut map = RelationshipMap::new();
        let mut unreadable = 0usize;

        for file in files {
            if !file.language.is_code() {
                continue;
            }

            let head = match read_prefix(&file.path, self.scan_chars) {
                Ok(head) => head,
                Err(e) => {
                    log::warn!(
                        "Skipping {} for relationship analysis: {e}",
                        file.relative_path
                    );
                    unreadable += 1;
                    continue;
                }
            };

            for reference in extract_references(&head, file.language) {
                let target = files.iter().find(|other| {
                    other.relative_path != file.relative_path
                        && matches_reference(&other.relative_path, &reference)
                });
                if let Some(target) = target {
                    map.add_reference(&target.relative_path, &file.relative_path);
                }
            }
        }

        log::debug!(
            "Built relationship map: {} files, {} edges ({} unreadable)",
            map.node_count(),
            map.edge_count(),
            unreadable
        );
        map
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Heuristic match of an import reference against a relative path, tried in order:
/// substring containment, dotted module translated to a path, basename equality
/// ignoring extension.
pub fn matches_reference(candidate_path: &str, reference: &str) -> bool {
    let candidate_lower = candidate_path.to_lowercase();
    let reference_lower = reference.to_lowercase();

    if candidate_lower.contains(&reference_lower) {
        return true;
    }

    if reference.contains('.') && candidate_lower.contains(&reference_lower.replace('.', "/")) {
        return true;
    }

    let reference_base = stem(reference);
    !reference_base.is_empty() && reference_base == stem(candidate_path)
}

/// Last path segment up to its first dot
fn stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}
