use crate::result::ContextResult;
use context_indexer::{read_prefix, FileRecord, CONFIG_FILE_NAMES};
use std::path::Path;

const STRUCTURE_MAX_FILES: usize = 15;
const CONFIG_MAX_CHARS: usize = 1500;

pub const STRUCTURE_HEADER: &str = "Repository Structure (showing context files):";
pub const TRUNCATION_NOTICE: &str = "Note: Some files were excluded due to token/size limits.";

/// Indented listing of the first selected files with their scores
pub fn structure_summary(selected: &[FileRecord]) -> String {
    let mut lines = vec![STRUCTURE_HEADER.to_string()];

    for file in selected.iter().take(STRUCTURE_MAX_FILES) {
        let indent = "  ".repeat(file.depth().saturating_sub(1));
        if file.score > 0.0 {
            lines.push(format!("{indent}- {} [{:.1}]", file.relative_path, file.score));
        } else {
            lines.push(format!("{indent}- {}", file.relative_path));
        }
    }

    if selected.len() > STRUCTURE_MAX_FILES {
        lines.push(format!(
            "  ... and {} more files",
            selected.len() - STRUCTURE_MAX_FILES
        ));
    }

    lines.join("\n")
}

/// `name:\ncontent` blocks for every well-known config file at the repository root.
///
/// Independent of selection: config files are digested whether or not they were
/// picked as context files.
pub fn config_digest(root: &Path) -> String {
    let mut blocks = Vec::new();

    for name in CONFIG_FILE_NAMES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        match read_prefix(&path, CONFIG_MAX_CHARS) {
            Ok(content) => blocks.push(format!("{name}:\n{content}")),
            Err(e) => log::warn!("Could not read config file {name}: {e}"),
        }
    }

    blocks.join("\n\n")
}

/// Render a result as one LLM-ready text block
pub fn format_for_llm(context: &ContextResult) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        "Repository Analysis ({} relevant files, ~{} tokens):",
        context.total_files, context.total_tokens
    ));
    parts.push(String::new());

    if !context.structure.is_empty() {
        parts.push(context.structure.clone());
        parts.push(String::new());
    }

    if !context.config_info.is_empty() {
        parts.push("Configuration Files:".to_string());
        parts.push(context.config_info.clone());
        parts.push(String::new());
    }

    if !context.files.is_empty() {
        parts.push("Relevant Source Files:".to_string());
        parts.push(String::new());

        for file in &context.files {
            parts.push(format!("--- {} ({}) ---", file.relative_path, file.language));
            parts.push(file.content.clone());
            parts.push(String::new());
        }
    }

    if context.truncated {
        parts.push(TRUNCATION_NOTICE.to_string());
    }

    parts.join("\n")
}
