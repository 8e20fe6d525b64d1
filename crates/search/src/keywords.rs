use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_KEYWORDS: usize = 50;

static QUOTED: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r#"["']([^"']+)["']"#).ok());

static FILE_NAME: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b\w+\.\w+\b").ok());

static IDENTIFIER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").ok());

static VOCABULARY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", TECH_TERMS.join("|"))).ok()
});

const TECH_TERMS: &[&str] = &[
    "function", "class", "method", "component", "service", "controller", "model", "view",
    "router", "handler", "middleware", "config", "setup", "init", "create", "update", "delete",
    "get", "post", "put", "api", "endpoint", "database", "db", "auth", "login", "register",
    "user", "admin", "dashboard", "form", "button", "input", "validation", "error", "exception",
    "test", "spec", "mock", "util", "helper", "lib", "library", "module", "package", "import",
    "export",
];

/// Derives relevance keywords from a free-text prompt.
///
/// Recall matters more than precision here: a spurious keyword only adds a small
/// bonus to paths that happen to contain it.
pub struct KeywordExtractor {
    max_keywords: usize,
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            max_keywords: MAX_KEYWORDS,
        }
    }

    /// Lower-cased, deduplicated keywords in first-seen order, at most 50
    pub fn extract(&self, prompt: &str) -> Vec<String> {
        if prompt.trim().is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<String> = Vec::new();

        if let Some(re) = QUOTED.as_ref() {
            candidates.extend(
                re.captures_iter(prompt)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()),
            );
        }

        if let Some(re) = FILE_NAME.as_ref() {
            candidates.extend(re.find_iter(prompt).map(|m| m.as_str().to_string()));
        }

        if let Some(re) = IDENTIFIER.as_ref() {
            for ident in re.find_iter(prompt).map(|m| m.as_str()) {
                if ident.chars().count() <= 2 {
                    continue;
                }
                candidates.push(ident.to_string());
                let parts = Self::split_identifier(ident);
                if parts.len() > 1 {
                    candidates.extend(parts.into_iter().filter(|p| p.chars().count() > 2));
                }
            }
        }

        if let Some(re) = VOCABULARY.as_ref() {
            let lowered = prompt.to_lowercase();
            candidates.extend(re.find_iter(&lowered).map(|m| m.as_str().to_string()));
        }

        let mut keywords: Vec<String> = Vec::new();
        for candidate in candidates {
            let keyword = candidate.trim().to_lowercase();
            if keyword.chars().count() <= 1 || keywords.contains(&keyword) {
                continue;
            }
            keywords.push(keyword);
            if keywords.len() == self.max_keywords {
                break;
            }
        }
        keywords
    }

    /// Split snake_case and camelCase/PascalCase identifiers into words
    fn split_identifier(ident: &str) -> Vec<String> {
        ident
            .split('_')
            .filter(|word| !word.is_empty())
            .flat_map(Self::split_camel_case)
            .collect()
    }

    fn split_camel_case(word: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut prev_upper = false;

        for ch in word.chars() {
            if ch.is_uppercase() {
                if !current.is_empty() && !prev_upper {
                    tokens.push(current.clone());
                    current.clear();
                }
                current.push(ch);
                prev_upper = true;
            } else {
                current.push(ch);
                prev_upper = false;
            }
        }

        if !current.is_empty() {
            tokens.push(current);
        }

        tokens
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_prompt_has_no_keywords() {
        let extractor = KeywordExtractor::new();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   ").is_empty());
    }

    #[test]
    fn plain_prompt_yields_identifiers_and_vocabulary() {
        let extractor = KeywordExtractor::new();
        assert_eq!(
            extractor.extract("fix the login validation bug"),
            vec!["fix", "the", "login", "validation", "bug"]
        );
    }

    #[test]
    fn quoted_file_names_come_first() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract(r#"update "auth.py" to use the DB"#);
        assert_eq!(keywords[0], "auth.py");
        assert!(keywords.contains(&"auth".to_string()));
        assert!(keywords.contains(&"update".to_string()));
        assert!(keywords.contains(&"db".to_string()));
        assert!(!keywords.contains(&"py".to_string()));
    }

    #[test]
    fn splits_compound_identifiers() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("loginHandler breaks in user_profile_view");
        for expected in [
            "loginhandler",
            "login",
            "handler",
            "user_profile_view",
            "user",
            "profile",
            "view",
        ] {
            assert!(keywords.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn keywords_are_lowercase_and_unique() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("Config config CONFIG");
        assert_eq!(keywords, vec!["config"]);
    }

    #[test]
    fn keyword_count_is_bounded() {
        let extractor = KeywordExtractor::new();
        let prompt: String = (0..200).map(|i| format!("word{i} ")).collect();
        assert_eq!(extractor.extract(&prompt).len(), MAX_KEYWORDS);
    }
}
