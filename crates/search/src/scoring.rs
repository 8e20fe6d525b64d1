use context_graph::RelationshipMap;
use context_indexer::{is_entry_point, FileRecord};

const CODE_EXTENSION_BONUS: f64 = 5.0;
const CONFIG_FILE_BONUS: f64 = 8.0;
const ENTRY_POINT_BONUS: f64 = 6.0;
const SHALLOW_PATH_BASE: f64 = 5.0;
const RECENT_WEEK_BONUS: f64 = 3.0;
const RECENT_MONTH_BONUS: f64 = 1.0;
const KEYWORD_MATCH_BONUS: f64 = 3.0;
const ANY_KEYWORD_BONUS: f64 = 2.0;
const FAN_IN_STEP: f64 = 0.5;
const FAN_IN_CAP: f64 = 3.0;

const DAY_MS: f64 = 86_400_000.0;

/// Additive importance scoring over path heuristics, recency, prompt keywords and
/// relationship fan-in
pub struct RelevanceScorer {
    now_ms: u64,
}

impl RelevanceScorer {
    /// `now_ms` is the reference time for recency, Unix milliseconds
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn score(
        &self,
        file: &FileRecord,
        keywords: &[String],
        relationships: &RelationshipMap,
    ) -> f64 {
        let mut score = 0.0;

        if file.language.is_code() {
            score += CODE_EXTENSION_BONUS;
        }
        if file.is_config() {
            score += CONFIG_FILE_BONUS;
        }
        if is_entry_point(&file.relative_path) {
            score += ENTRY_POINT_BONUS;
        }

        score += (SHALLOW_PATH_BASE - file.depth() as f64).max(0.0);
        score += self.recency_bonus(file.modified_ms);

        let path = file.relative_path.to_lowercase();
        let matches = keywords
            .iter()
            .filter(|keyword| path.contains(keyword.to_lowercase().as_str()))
            .count();
        if matches > 0 {
            score += KEYWORD_MATCH_BONUS * matches as f64 + ANY_KEYWORD_BONUS;
        }

        let fan_in = relationships.fan_in(&file.relative_path);
        score += (FAN_IN_STEP * fan_in as f64).min(FAN_IN_CAP);

        score
    }

    fn recency_bonus(&self, modified_ms: u64) -> f64 {
        let days_old = self.now_ms.saturating_sub(modified_ms) as f64 / DAY_MS;
        if days_old < 7.0 {
            RECENT_WEEK_BONUS
        } else if days_old < 30.0 {
            RECENT_MONTH_BONUS
        } else {
            0.0
        }
    }

    /// Score every file and sort descending; ties keep scan order
    pub fn rank(
        &self,
        mut files: Vec<FileRecord>,
        keywords: &[String],
        relationships: &RelationshipMap,
    ) -> Vec<FileRecord> {
        for file in &mut files {
            file.score = self.score(file, keywords, relationships);
        }
        files.sort_by(|a, b| b.score.total_cmp(&a.score));
        files
    }
}
