use context_indexer::FileRecord;

/// Files scoring below this are dropped unless they are well-known config files
pub const RELEVANCE_FLOOR: f64 = 1.0;

/// Estimated characters per token
const CHARS_PER_TOKEN: usize = 3;

/// Greedy prefix selection under a token budget and a file-count cap
#[derive(Debug, Clone, Copy)]
pub struct BudgetSelector {
    max_tokens: usize,
    max_files: usize,
    max_file_chars: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Accepted files in ranking order
    pub files: Vec<FileRecord>,

    /// Candidates that passed the relevance floor
    pub eligible: usize,

    /// Sum of pre-read token estimates for `files`
    pub estimated_tokens: usize,
}

impl Selection {
    /// Some eligible candidate was left out
    pub fn truncated(&self) -> bool {
        self.files.len() < self.eligible
    }
}

impl BudgetSelector {
    pub fn new(max_tokens: usize, max_files: usize, max_file_chars: usize) -> Self {
        Self {
            max_tokens,
            max_files,
            max_file_chars,
        }
    }

    /// Conservative pre-read token estimate
    pub fn estimate_tokens(&self, file: &FileRecord) -> usize {
        let size = usize::try_from(file.size).unwrap_or(usize::MAX);
        (size / CHARS_PER_TOKEN).min(self.max_file_chars / CHARS_PER_TOKEN)
    }

    fn passes_floor(file: &FileRecord) -> bool {
        file.score >= RELEVANCE_FLOOR || file.is_config()
    }

    /// Walk `ranked` once, accepting files until the next eligible one would exceed
    /// the file cap or the token budget.
    ///
    /// The walk stops at the first file that does not fit; smaller files further down
    /// are not tried.
    pub fn select(&self, ranked: &[FileRecord]) -> Selection {
        let mut selection = Selection {
            eligible: ranked.iter().filter(|f| Self::passes_floor(f)).count(),
            ..Selection::default()
        };

        for file in ranked.iter().filter(|f| Self::passes_floor(f)) {
            let tokens = self.estimate_tokens(file);
            if selection.files.len() >= self.max_files
                || selection.estimated_tokens + tokens > self.max_tokens
            {
                break;
            }
            selection.estimated_tokens += tokens;
            selection.files.push(file.clone());
        }

        log::debug!(
            "Selected {}/{} eligible files (~{} tokens estimated)",
            selection.files.len(),
            selection.eligible,
            selection.estimated_tokens
        );
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn scored(relative_path: &str, size: u64, score: f64) -> FileRecord {
        let mut file = FileRecord::new(
            PathBuf::from("/repo").join(relative_path),
            relative_path.to_string(),
            size,
            0,
        );
        file.score = score;
        file
    }

    fn paths(selection: &Selection) -> Vec<&str> {
        selection
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect()
    }

    #[test]
    fn estimate_is_capped_by_char_budget() {
        let selector = BudgetSelector::new(1000, 10, 300);
        assert_eq!(selector.estimate_tokens(&scored("a.py", 90, 5.0)), 30);
        assert_eq!(selector.estimate_tokens(&scored("b.py", 9000, 5.0)), 100);
    }

    #[test]
    fn low_scores_are_dropped_except_config() {
        let selector = BudgetSelector::new(1000, 10, 300);
        let ranked = vec![
            scored("main.py", 30, 10.0),
            scored("junk.txt", 30, 0.5),
            scored("LICENSE", 30, 0.0),
        ];

        let selection = selector.select(&ranked);

        assert_eq!(paths(&selection), vec!["main.py", "LICENSE"]);
        assert_eq!(selection.eligible, 2);
        assert!(!selection.truncated());
    }

    #[test]
    fn stops_at_file_cap() {
        let selector = BudgetSelector::new(1000, 2, 300);
        let ranked = vec![
            scored("a.py", 30, 9.0),
            scored("b.py", 30, 8.0),
            scored("c.py", 30, 7.0),
        ];

        let selection = selector.select(&ranked);

        assert_eq!(paths(&selection), vec!["a.py", "b.py"]);
        assert!(selection.truncated());
    }

    #[test]
    fn greedy_prefix_does_not_skip_ahead() {
        let selector = BudgetSelector::new(100, 10, 3000);
        let ranked = vec![
            scored("a.py", 150, 9.0),  // 50 tokens
            scored("big.py", 300, 8.0), // 100 tokens, does not fit
            scored("tiny.py", 3, 7.0), // would fit, never reached
        ];

        let selection = selector.select(&ranked);

        assert_eq!(paths(&selection), vec!["a.py"]);
        assert_eq!(selection.estimated_tokens, 50);
        assert_eq!(selection.eligible, 3);
        assert!(selection.truncated());
    }

    #[test]
    fn exact_budget_fits() {
        let selector = BudgetSelector::new(100, 10, 3000);
        let ranked = vec![scored("a.py", 150, 9.0), scored("b.py", 150, 8.0)];

        let selection = selector.select(&ranked);

        assert_eq!(selection.estimated_tokens, 100);
        assert_eq!(selection.files.len(), 2);
    }
}
