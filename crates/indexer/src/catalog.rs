use serde::{Deserialize, Serialize};
use std::fmt;

/// Language tag derived from a file extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    CSharp,
    Php,
    Ruby,
    Go,
    Rust,
    Swift,
    Kotlin,
    Scala,
    R,
    Sql,
    Bash,
    Batch,
    PowerShell,
    Yaml,
    Json,
    Xml,
    Html,
    Css,
    Scss,
    Sass,
    Markdown,
    Dockerfile,
    Terraform,
    /// Fallback for every extension outside the table
    #[default]
    Text,
}

impl Language {
    /// Map a lower-cased extension (without the dot) to its language tag
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "py" => Self::Python,
            "js" | "jsx" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "java" => Self::Java,
            "cpp" => Self::Cpp,
            "c" | "h" => Self::C,
            "cs" => Self::CSharp,
            "php" => Self::Php,
            "rb" => Self::Ruby,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "swift" => Self::Swift,
            "kt" => Self::Kotlin,
            "scala" => Self::Scala,
            "r" => Self::R,
            "sql" => Self::Sql,
            "sh" => Self::Bash,
            "bat" => Self::Batch,
            "ps1" => Self::PowerShell,
            "yml" | "yaml" => Self::Yaml,
            "json" => Self::Json,
            "xml" => Self::Xml,
            "html" => Self::Html,
            "css" => Self::Css,
            "scss" => Self::Scss,
            "sass" => Self::Sass,
            "md" => Self::Markdown,
            "dockerfile" => Self::Dockerfile,
            "tf" => Self::Terraform,
            _ => Self::Text,
        }
    }

    /// True for every extension present in the language table
    pub fn is_code(self) -> bool {
        self != Self::Text
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::CSharp => "csharp",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Scala => "scala",
            Self::R => "r",
            Self::Sql => "sql",
            Self::Bash => "bash",
            Self::Batch => "batch",
            Self::PowerShell => "powershell",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Html => "html",
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Sass => "sass",
            Self::Markdown => "markdown",
            Self::Dockerfile => "dockerfile",
            Self::Terraform => "terraform",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known configuration files, in the order the config digest visits them
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "Gemfile",
    "composer.json",
    "pubspec.yaml",
    "build.gradle",
    "CMakeLists.txt",
    ".gitignore",
    "README.md",
    "LICENSE",
    "Dockerfile",
    "docker-compose.yml",
    "pyproject.toml",
    "setup.py",
    "Makefile",
    "webpack.config.js",
    "tsconfig.json",
];

pub const ENTRY_POINT_NAMES: &[&str] = &[
    "main.py",
    "index.js",
    "app.py",
    "server.js",
    "main.go",
    "main.rs",
];

/// Exact (case-sensitive) basename match against [`CONFIG_FILE_NAMES`]
pub fn is_config_file(file_name: &str) -> bool {
    CONFIG_FILE_NAMES.contains(&file_name)
}

/// Case-insensitive containment of any entry-point basename in a relative path.
///
/// This is a substring test over the whole path, so `domain.py` counts as
/// containing `main.py`.
pub fn is_entry_point(relative_path: &str) -> bool {
    let lowered = relative_path.to_lowercase();
    ENTRY_POINT_NAMES
        .iter()
        .any(|name| lowered.contains(name))
}
