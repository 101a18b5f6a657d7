//! Language and project-type detection.
//!
//! Pure table lookups: file extensions map to languages, marker files and
//! dependency manifests map to project types and framework names.

use std::collections::BTreeSet;
use std::path::Path;

use super::scanner::FileInfo;

/// Programming language detected from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Go,
    Rust,
    Cpp,
    C,
    CSharp,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Scala,
    Dart,
    Lua,
    Shell,
    Html,
    Css,
    Sql,
    Other,
}

impl Language {
    /// Display name used in summaries and prompt context.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Java => "Java",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::CSharp => "C#",
            Self::Ruby => "Ruby",
            Self::Php => "PHP",
            Self::Swift => "Swift",
            Self::Kotlin => "Kotlin",
            Self::Scala => "Scala",
            Self::Dart => "Dart",
            Self::Lua => "Lua",
            Self::Shell => "Shell",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Sql => "SQL",
            Self::Other => "Other",
        }
    }

    /// Map a lowercase file extension (with leading dot) to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext {
            ".py" | ".pyw" | ".pyi" => Self::Python,
            ".js" | ".mjs" | ".cjs" | ".jsx" => Self::JavaScript,
            ".ts" | ".tsx" => Self::TypeScript,
            ".java" => Self::Java,
            ".go" => Self::Go,
            ".rs" => Self::Rust,
            ".cpp" | ".cc" | ".cxx" | ".hpp" => Self::Cpp,
            ".c" | ".h" => Self::C,
            ".cs" => Self::CSharp,
            ".rb" => Self::Ruby,
            ".php" => Self::Php,
            ".swift" => Self::Swift,
            ".kt" | ".kts" => Self::Kotlin,
            ".scala" => Self::Scala,
            ".dart" => Self::Dart,
            ".lua" => Self::Lua,
            ".sh" | ".bash" | ".zsh" => Self::Shell,
            ".html" | ".htm" => Self::Html,
            ".css" | ".scss" | ".less" => Self::Css,
            ".sql" => Self::Sql,
            _ => return None,
        };
        Some(lang)
    }

    /// Whether files in this language make sense as prose/code snippets.
    pub fn is_snippet_worthy(self) -> bool {
        !matches!(self, Self::Html | Self::Css | Self::Sql)
    }
}

/// Broad project category detected from marker files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProjectType {
    WebFrontend,
    WebBackend,
    Fullstack,
    Mobile,
    Cli,
    Library,
    Api,
    DataScience,
    DevOps,
    Game,
    Embedded,
    Other,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebFrontend => "Web Frontend",
            Self::WebBackend => "Web Backend",
            Self::Fullstack => "Full-Stack Web",
            Self::Mobile => "Mobile App",
            Self::Cli => "CLI Tool",
            Self::Library => "Library/Package",
            Self::Api => "API Service",
            Self::DataScience => "Data Science",
            Self::DevOps => "DevOps/Infrastructure",
            Self::Game => "Game",
            Self::Embedded => "Embedded/IoT",
            Self::Other => "Other",
        }
    }
}

/// Marker files that identify project types and tooling regardless of
/// file contents.
const MARKER_FILES: &[(&str, Option<ProjectType>, &str)] = &[
    ("Cargo.toml", None, "Rust/Cargo"),
    ("go.mod", None, "Go Modules"),
    ("pom.xml", None, "Maven"),
    ("build.gradle", None, "Gradle"),
    ("Gemfile", None, "Ruby/Bundler"),
    ("composer.json", None, "PHP/Composer"),
    ("Dockerfile", Some(ProjectType::DevOps), "Docker"),
    ("docker-compose.yml", Some(ProjectType::DevOps), "Docker Compose"),
    ("docker-compose.yaml", Some(ProjectType::DevOps), "Docker Compose"),
    ("Makefile", None, "Make"),
    ("CMakeLists.txt", None, "CMake"),
    ("terraform.tf", Some(ProjectType::DevOps), "Terraform"),
    ("serverless.yml", Some(ProjectType::Api), "Serverless Framework"),
    ("Podfile", Some(ProjectType::Mobile), "CocoaPods"),
    ("pubspec.yaml", Some(ProjectType::Mobile), "Flutter"),
];

/// package.json dependency keys that identify JS/TS frameworks.
const PACKAGE_JSON_FRAMEWORKS: &[(&str, ProjectType, &str)] = &[
    ("react-native", ProjectType::Mobile, "React Native"),
    ("react", ProjectType::WebFrontend, "React"),
    ("next", ProjectType::Fullstack, "Next.js"),
    ("vue", ProjectType::WebFrontend, "Vue.js"),
    ("nuxt", ProjectType::Fullstack, "Nuxt.js"),
    ("angular", ProjectType::WebFrontend, "Angular"),
    ("svelte", ProjectType::WebFrontend, "Svelte"),
    ("express", ProjectType::WebBackend, "Express.js"),
    ("fastify", ProjectType::WebBackend, "Fastify"),
    ("nestjs", ProjectType::WebBackend, "NestJS"),
    ("electron", ProjectType::Other, "Electron"),
    ("expo", ProjectType::Mobile, "Expo"),
];

/// Substrings in Python dependency files that identify frameworks.
const PYTHON_FRAMEWORKS: &[(&str, ProjectType, &str)] = &[
    ("django", ProjectType::WebBackend, "Django"),
    ("flask", ProjectType::WebBackend, "Flask"),
    ("fastapi", ProjectType::Api, "FastAPI"),
    ("starlette", ProjectType::Api, "Starlette"),
    ("celery", ProjectType::WebBackend, "Celery"),
    ("pandas", ProjectType::DataScience, "Pandas"),
    ("numpy", ProjectType::DataScience, "NumPy"),
    ("tensorflow", ProjectType::DataScience, "TensorFlow"),
    ("torch", ProjectType::DataScience, "PyTorch"),
    ("scikit-learn", ProjectType::DataScience, "scikit-learn"),
    ("click", ProjectType::Cli, "Click"),
    ("typer", ProjectType::Cli, "Typer"),
];

/// Rust dependency names that identify frameworks.
const RUST_FRAMEWORKS: &[(&str, ProjectType, &str)] = &[
    ("axum", ProjectType::Api, "Axum"),
    ("actix-web", ProjectType::Api, "Actix Web"),
    ("rocket", ProjectType::Api, "Rocket"),
    ("clap", ProjectType::Cli, "clap"),
    ("ratatui", ProjectType::Cli, "Ratatui"),
    ("bevy", ProjectType::Game, "Bevy"),
    ("embedded-hal", ProjectType::Embedded, "embedded-hal"),
];

/// Assign a language to every file and return per-language (files, lines)
/// counts keyed by display name.
pub fn assign_languages(files: &mut [FileInfo]) -> std::collections::BTreeMap<String, (usize, usize)> {
    let mut counts: std::collections::BTreeMap<String, (usize, usize)> = Default::default();
    for file in files.iter_mut() {
        file.language = Language::from_extension(&file.extension);
        if let Some(lang) = file.language {
            let entry = counts.entry(lang.as_str().to_string()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += file.line_count;
        }
    }
    counts
}

/// Detect project types and framework names from marker files and
/// dependency manifests. Framework order is preserved, duplicates dropped.
pub fn detect_project_types(root: &Path, files: &[FileInfo]) -> (Vec<ProjectType>, Vec<String>) {
    let mut types: BTreeSet<ProjectType> = BTreeSet::new();
    let mut frameworks: Vec<String> = Vec::new();

    let rel_paths: BTreeSet<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

    for (marker, ptype, framework) in MARKER_FILES {
        if rel_paths.contains(marker) || root.join(marker).exists() {
            if let Some(t) = ptype {
                types.insert(*t);
            }
            frameworks.push((*framework).to_string());
        }
    }

    if let Ok(content) = std::fs::read_to_string(root.join("package.json")) {
        let content = content.to_lowercase();
        for (key, ptype, name) in PACKAGE_JSON_FRAMEWORKS {
            if content.contains(&format!("\"{key}\"")) {
                types.insert(*ptype);
                frameworks.push((*name).to_string());
            }
        }
    }

    for dep_file in ["requirements.txt", "pyproject.toml", "setup.py", "Pipfile"] {
        if let Ok(content) = std::fs::read_to_string(root.join(dep_file)) {
            let content = content.to_lowercase();
            for (key, ptype, name) in PYTHON_FRAMEWORKS {
                if content.contains(key) {
                    types.insert(*ptype);
                    frameworks.push((*name).to_string());
                }
            }
        }
    }

    if let Ok(content) = std::fs::read_to_string(root.join("Cargo.toml")) {
        let content = content.to_lowercase();
        for (key, ptype, name) in RUST_FRAMEWORKS {
            if content.contains(key) {
                types.insert(*ptype);
                frameworks.push((*name).to_string());
            }
        }
    }

    let mut seen = BTreeSet::new();
    frameworks.retain(|f| seen.insert(f.clone()));

    (types.into_iter().collect(), frameworks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(Language::from_extension(".rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension(".tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension(".kts"), Some(Language::Kotlin));
        assert_eq!(Language::from_extension(".xyz"), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Language::Cpp.as_str(), "C++");
        assert_eq!(ProjectType::Fullstack.as_str(), "Full-Stack Web");
    }

    #[test]
    fn test_detect_from_markers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "FROM debian\n").unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[dependencies]\nclap = \"4\"\n").unwrap();

        let (types, frameworks) = detect_project_types(dir.path(), &[]);
        assert!(types.contains(&ProjectType::DevOps));
        assert!(types.contains(&ProjectType::Cli));
        assert!(frameworks.iter().any(|f| f == "Docker"));
        assert!(frameworks.iter().any(|f| f == "Rust/Cargo"));
        assert!(frameworks.iter().any(|f| f == "clap"));
    }

    #[test]
    fn test_frameworks_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        // Both compose spellings present; the framework name appears once.
        std::fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        std::fs::write(dir.path().join("docker-compose.yaml"), "services: {}\n").unwrap();

        let (_, frameworks) = detect_project_types(dir.path(), &[]);
        assert_eq!(frameworks.iter().filter(|f| *f == "Docker Compose").count(), 1);
    }
}
