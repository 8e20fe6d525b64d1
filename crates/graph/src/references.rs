use context_indexer::Language;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("Invalid reference pattern {pattern}: {e}");
                None
            }
        })
        .collect()
}

static PYTHON_IMPORTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"from\s+([a-zA-Z_][a-zA-Z0-9_.]*)\s+import",
        r"import\s+([a-zA-Z_][a-zA-Z0-9_.]*)",
    ])
});

static SCRIPT_IMPORTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"import.*from\s+["']([^"']+)["']"#,
        r#"require\(["']([^"']+)["']\)"#,
        r#"import\(["']([^"']+)["']\)"#,
    ])
});

static JAVA_IMPORTS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"import\s+([a-zA-Z_][a-zA-Z0-9_.]*)"]));

static GO_SINGLE_IMPORT: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r#"import\s+"([^"]+)""#]));

static GO_IMPORT_BLOCK: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"(?s)import\s*\((.*?)\)"]));

static QUOTED: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r#""([^"]+)""#]));

static C_INCLUDES: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r#"#include\s+[<"]([^>"]+)[>"]"#]));

fn captures(patterns: &[Regex], content: &str, out: &mut Vec<String>) {
    for re in patterns {
        out.extend(
            re.captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        );
    }
}

/// Extract raw reference strings (module paths, specifiers, include targets).
///
/// Languages without a pattern set yield nothing.
pub fn extract_references(content: &str, language: Language) -> Vec<String> {
    let mut references = Vec::new();
    match language {
        Language::Python => captures(&PYTHON_IMPORTS, content, &mut references),
        Language::JavaScript | Language::TypeScript => {
            captures(&SCRIPT_IMPORTS, content, &mut references)
        }
        Language::Java => captures(&JAVA_IMPORTS, content, &mut references),
        Language::Go => {
            captures(&GO_SINGLE_IMPORT, content, &mut references);
            let mut blocks = Vec::new();
            captures(&GO_IMPORT_BLOCK, content, &mut blocks);
            for block in blocks {
                captures(&QUOTED, &block, &mut references);
            }
        }
        Language::C | Language::Cpp => captures(&C_INCLUDES, content, &mut references),
        _ => {}
    }
    references
}
