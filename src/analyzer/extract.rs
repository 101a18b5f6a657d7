//! Metadata extraction for prompt context.
//!
//! Pulls README excerpts, dependency names, representative code snippets,
//! and import samples out of a scanned file list. All best-effort: missing
//! or unreadable files simply contribute nothing.

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::language::Language;
use super::scanner::FileInfo;

const MAX_SNIPPET_LINES: usize = 60;
const MAX_README_CHARS: usize = 3000;
const MAX_CONFIG_CHARS: usize = 2000;

/// Config files worth quoting to the generator.
const CONFIG_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "pyproject.toml",
    "setup.cfg",
    "setup.py",
    "Cargo.toml",
    "go.mod",
    "build.gradle",
    "pom.xml",
    "Gemfile",
    "composer.json",
    "pubspec.yaml",
    "vite.config.ts",
    "vite.config.js",
    "next.config.js",
    "next.config.mjs",
];

/// A quoted fragment of a project file.
#[derive(Debug, Clone)]
pub struct CodeSnippet {
    pub file_path: String,
    /// Language label for the fenced block
    pub language_label: String,
    pub content: String,
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Read the project README, truncated to a prompt-friendly excerpt.
pub fn extract_readme(root: &Path) -> String {
    for name in ["README.md", "README.rst", "README.txt", "README"] {
        if let Ok(content) = std::fs::read_to_string(root.join(name)) {
            return truncate_chars(&content, MAX_README_CHARS).to_string();
        }
    }
    String::new()
}

static PKG_DEP_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:dependencies|devDependencies)"\s*:\s*\{([^}]*)\}"#).expect("valid regex")
});
static PKG_DEP_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"\s*:"#).expect("valid regex"));
static PY_DEP_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[>=<!\[;]").expect("valid regex"));

/// Extract top-level dependency names from common manifests.
pub fn extract_dependencies(root: &Path) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();

    if let Ok(content) = std::fs::read_to_string(root.join("package.json")) {
        for block in PKG_DEP_BLOCK.captures_iter(&content) {
            if let Some(body) = block.get(1) {
                for name in PKG_DEP_NAME.captures_iter(body.as_str()) {
                    deps.push(name[1].to_string());
                }
            }
        }
    }

    if let Ok(content) = std::fs::read_to_string(root.join("requirements.txt")) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }
            let name = PY_DEP_SPLIT.split(line).next().unwrap_or("").trim();
            if !name.is_empty() {
                deps.push(name.to_string());
            }
        }
    }

    if let Ok(content) = std::fs::read_to_string(root.join("pyproject.toml")) {
        let mut in_deps = false;
        for line in content.lines() {
            if !in_deps && line.trim_start().starts_with("dependencies") && line.contains('[') {
                in_deps = true;
                continue;
            }
            if in_deps {
                if line.contains(']') {
                    in_deps = false;
                    continue;
                }
                if let Some(start) = line.find('"') {
                    if let Some(end) = line[start + 1..].find('"') {
                        let spec = &line[start + 1..start + 1 + end];
                        let name = PY_DEP_SPLIT.split(spec).next().unwrap_or("").trim();
                        if !name.is_empty() {
                            deps.push(name.to_string());
                        }
                    }
                }
            }
        }
    }

    if let Ok(content) = std::fs::read_to_string(root.join("Cargo.toml")) {
        let mut in_deps = false;
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('[') {
                in_deps = trimmed == "[dependencies]" || trimmed == "[dev-dependencies]";
                continue;
            }
            if in_deps && !trimmed.is_empty() && !trimmed.starts_with('#') {
                if let Some(name) = trimmed.split('=').next() {
                    let name = name.trim();
                    if !name.is_empty() {
                        deps.push(name.to_string());
                    }
                }
            }
        }
    }

    deps
}

/// Read at most `max_lines` from a file.
fn read_head(path: &Path, max_lines: usize) -> String {
    std::fs::read_to_string(path)
        .map(|content| content.lines().take(max_lines).collect::<Vec<_>>().join("\n"))
        .unwrap_or_default()
}

/// Quote known config files found in the scan.
pub fn extract_config_snippets(files: &[FileInfo]) -> Vec<CodeSnippet> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut snippets = Vec::new();

    for file in files {
        let name = Path::new(&file.relative_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let Some(known) = CONFIG_FILES.iter().find(|c| **c == name) else {
            continue;
        };
        if !seen.insert(known) {
            continue;
        }
        let content = read_head(&file.path, MAX_SNIPPET_LINES);
        if !content.trim().is_empty() {
            snippets.push(CodeSnippet {
                file_path: file.relative_path.clone(),
                language_label: file
                    .language
                    .map_or_else(|| "text".to_string(), |l| l.as_str().to_lowercase()),
                content: truncate_chars(&content, MAX_CONFIG_CHARS).to_string(),
            });
        }
    }
    snippets
}

/// Score a file for how interesting its head is as prompt context.
fn score_file(file: &FileInfo) -> i32 {
    let mut score = 0;
    if (20..=300).contains(&file.line_count) {
        score += 10;
    } else if file.line_count > 300 {
        score += 3;
    }

    let rel = file.relative_path.to_lowercase();
    if ["src/", "lib/", "app/", "pkg/", "cmd/"].iter().any(|d| rel.starts_with(d)) {
        score += 5;
    }

    let name = Path::new(&rel).file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    if [
        "main.py", "app.py", "index.ts", "index.js", "main.go", "main.rs", "server.py",
        "server.ts", "lib.rs",
    ]
    .contains(&name.as_str())
    {
        score += 15;
    }
    for keyword in
        ["handler", "service", "controller", "router", "model", "schema", "api", "core", "engine"]
    {
        if name.contains(keyword) {
            score += 8;
            break;
        }
    }
    score
}

/// Pick the most interesting source files and quote their heads.
pub fn extract_interesting_snippets(files: &[FileInfo], max_snippets: usize) -> Vec<CodeSnippet> {
    let mut candidates: Vec<&FileInfo> = files
        .iter()
        .filter(|f| f.language.map_or(false, Language::is_snippet_worthy))
        .collect();
    candidates.sort_by_key(|f| std::cmp::Reverse(score_file(f)));

    let mut snippets = Vec::new();
    for file in candidates.into_iter().take(max_snippets) {
        let content = read_head(&file.path, MAX_SNIPPET_LINES);
        if !content.trim().is_empty() {
            snippets.push(CodeSnippet {
                file_path: file.relative_path.clone(),
                language_label: file
                    .language
                    .map_or_else(|| "text".to_string(), |l| l.as_str().to_lowercase()),
                content,
            });
        }
    }
    snippets
}

/// Collect a deduplicated sample of import statements across the largest
/// source files.
pub fn extract_imports(files: &[FileInfo], max_files: usize) -> Vec<String> {
    let mut imports: BTreeSet<String> = BTreeSet::new();
    let mut candidates: Vec<&FileInfo> =
        files.iter().filter(|f| f.language.is_some() && f.line_count > 5).collect();
    candidates.sort_by_key(|f| std::cmp::Reverse(f.line_count));

    for file in candidates.into_iter().take(max_files) {
        let Ok(content) = std::fs::read_to_string(&file.path) else {
            continue;
        };
        for line in content.lines().take(100) {
            let line = line.trim();
            let is_import = line.starts_with("import ")
                || line.starts_with("from ")
                || line.starts_with("use ")
                || line.contains("require(");
            if is_import {
                imports.insert(line.to_string());
            }
        }
        if imports.len() > 200 {
            break;
        }
    }

    imports.into_iter().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::scanner::scan_project;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }

    #[test]
    fn test_extract_readme() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "README.md", "# My Project\nGreat stuff.\n");
        let readme = extract_readme(dir.path());
        assert!(readme.starts_with("# My Project"));

        let empty = tempfile::tempdir().unwrap();
        assert!(extract_readme(empty.path()).is_empty());
    }

    #[test]
    fn test_extract_dependencies_package_json() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "package.json",
            r#"{"dependencies": {"react": "^18", "axios": "1.0"}, "devDependencies": {"jest": "29"}}"#,
        );
        let deps = extract_dependencies(dir.path());
        assert!(deps.contains(&"react".to_string()));
        assert!(deps.contains(&"axios".to_string()));
        assert!(deps.contains(&"jest".to_string()));
    }

    #[test]
    fn test_extract_dependencies_requirements() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "requirements.txt", "# comment\nfastapi>=0.100\nuvicorn[standard]==0.23\n-r other.txt\n");
        let deps = extract_dependencies(dir.path());
        assert_eq!(deps, vec!["fastapi".to_string(), "uvicorn".to_string()]);
    }

    #[test]
    fn test_extract_dependencies_cargo_toml() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Cargo.toml",
            "[package]\nname = \"demo\"\n\n[dependencies]\nserde = \"1\"\ntokio = { version = \"1\" }\n",
        );
        let deps = extract_dependencies(dir.path());
        assert!(deps.contains(&"serde".to_string()));
        assert!(deps.contains(&"tokio".to_string()));
        assert!(!deps.contains(&"name".to_string()));
    }

    #[test]
    fn test_interesting_snippets_prefer_entry_points() {
        let dir = tempfile::tempdir().unwrap();
        let body: String = (0..30).map(|i| format!("line {i}\n")).collect();
        write(dir.path(), "src/main.rs", &format!("fn main() {{}}\n{body}"));
        write(dir.path(), "notes.rs", &body);

        let mut files = scan_project(dir.path()).unwrap();
        crate::analyzer::language::assign_languages(&mut files);

        let snippets = extract_interesting_snippets(&files, 1);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].file_path, "src/main.rs");
    }

    #[test]
    fn test_extract_imports() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "src/lib.rs",
            "use std::fs;\nuse serde::Serialize;\nfn work() {}\nmore\nlines\nhere\n",
        );
        let mut files = scan_project(dir.path()).unwrap();
        crate::analyzer::language::assign_languages(&mut files);

        let imports = extract_imports(&files, 5);
        assert!(imports.contains(&"use std::fs;".to_string()));
        assert!(imports.contains(&"use serde::Serialize;".to_string()));
    }
}
