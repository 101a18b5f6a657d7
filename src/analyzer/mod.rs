//! Project analysis.
//!
//! Scans a codebase and condenses it into a [`ProjectSummary`]: the
//! structural digest the generation gateway receives as context. The
//! analyzer is a collaborator of the workflow core; it knows nothing about
//! sessions or articles.

mod extract;
mod language;
mod scanner;

pub use extract::CodeSnippet;
pub use language::{Language, ProjectType};
pub use scanner::FileInfo;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Per-language file and line counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LanguageStat {
    pub files: usize,
    pub lines: usize,
}

/// Structural digest of a scanned codebase. Immutable once produced;
/// owned by the session that requested the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project name (directory basename)
    pub name: String,
    pub total_files: usize,
    pub total_lines: usize,
    /// Display name of the most common language, if any was detected
    pub primary_language: Option<String>,
    /// Language display name to file/line counts
    pub languages: BTreeMap<String, LanguageStat>,
    /// Detected project-type tags ("CLI Tool", "API Service", ...)
    pub project_types: Vec<String>,
    /// Detected framework/tool names
    pub frameworks: Vec<String>,
    /// Top-level dependency names, capped
    pub dependencies: Vec<String>,
    /// Excerpt from the project's top-level documentation
    pub readme_excerpt: String,
    /// Prompt-ready rendering of the whole analysis. Not serialized;
    /// rebuilt whenever the summary is produced.
    #[serde(skip)]
    pub prompt_context: String,
}

const MAX_DEPENDENCIES: usize = 50;
const MAX_SNIPPETS: usize = 8;
const MAX_TREE_LINES: usize = 80;

/// Run the full analysis pipeline over a project directory.
pub fn analyze_project(root: &Path) -> anyhow::Result<ProjectSummary> {
    let root = root.canonicalize()?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());

    let mut files = scanner::scan_project(&root)?;
    let lang_counts = language::assign_languages(&mut files);

    let primary_language = lang_counts
        .iter()
        .max_by_key(|(_, (file_count, _))| *file_count)
        .map(|(name, _)| name.clone());

    let (project_types, frameworks) = language::detect_project_types(&root, &files);

    let readme_excerpt = extract::extract_readme(&root);
    let mut dependencies = extract::extract_dependencies(&root);
    dependencies.truncate(MAX_DEPENDENCIES);

    let mut snippets = extract::extract_config_snippets(&files);
    snippets.extend(extract::extract_interesting_snippets(&files, MAX_SNIPPETS));
    let imports = extract::extract_imports(&files, 20);

    let total_files = files.len();
    let total_lines = files.iter().map(|f| f.line_count).sum();

    let languages: BTreeMap<String, LanguageStat> = lang_counts
        .into_iter()
        .map(|(name, (file_count, line_count))| {
            (name, LanguageStat { files: file_count, lines: line_count })
        })
        .collect();

    let mut summary = ProjectSummary {
        name,
        total_files,
        total_lines,
        primary_language,
        languages,
        project_types: project_types.iter().map(|t| t.as_str().to_string()).collect(),
        frameworks,
        dependencies,
        readme_excerpt,
        prompt_context: String::new(),
    };
    summary.prompt_context = render_prompt_context(&summary, &files, &snippets, &imports);

    tracing::debug!(
        project = %summary.name,
        files = summary.total_files,
        lines = summary.total_lines,
        "analysis complete"
    );

    Ok(summary)
}

/// Render the analysis as the text block Claude receives as context.
fn render_prompt_context(
    summary: &ProjectSummary,
    files: &[FileInfo],
    snippets: &[CodeSnippet],
    imports: &[String],
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("# Project: {}", summary.name));
    parts.push(format!(
        "Total files: {} | Total lines: {}",
        summary.total_files, summary.total_lines
    ));

    if !summary.project_types.is_empty() {
        parts.push(format!("Project types: {}", summary.project_types.join(", ")));
    }

    if let Some(ref primary) = summary.primary_language {
        parts.push(format!("Primary language: {primary}"));
        let mut by_count: Vec<(&String, &LanguageStat)> = summary.languages.iter().collect();
        by_count.sort_by_key(|(_, stat)| std::cmp::Reverse(stat.files));
        let breakdown = by_count
            .iter()
            .take(6)
            .map(|(name, stat)| format!("{name}: {}", stat.files))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Language breakdown: {breakdown}"));
    }

    if !summary.frameworks.is_empty() {
        parts.push(format!("Frameworks/Tools: {}", summary.frameworks.join(", ")));
    }

    if !summary.dependencies.is_empty() {
        let deps: Vec<&str> =
            summary.dependencies.iter().take(30).map(String::as_str).collect();
        parts.push(format!("Dependencies: {}", deps.join(", ")));
    }

    if !summary.readme_excerpt.is_empty() {
        parts.push(format!("\n## README (excerpt)\n{}", summary.readme_excerpt));
    }

    if !imports.is_empty() {
        let sample: Vec<&str> = imports.iter().take(40).map(String::as_str).collect();
        parts.push(format!("\n## Import statements (sample)\n{}", sample.join("\n")));
    }

    if !snippets.is_empty() {
        parts.push("\n## Key code snippets".to_string());
        for snippet in snippets {
            parts.push(format!(
                "\n### {}\n```{}\n{}\n```",
                snippet.file_path, snippet.language_label, snippet.content
            ));
        }
    }

    parts.push("\n## File tree".to_string());
    for file in files.iter().take(MAX_TREE_LINES) {
        parts.push(format!("  {}", file.relative_path));
    }
    if files.len() > MAX_TREE_LINES {
        parts.push(format!("  ... and {} more files", files.len() - MAX_TREE_LINES));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn demo_project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("README.md"), "# Demo\nA demo CLI for tests.\n").unwrap();
        fs::write(
            root.join("Cargo.toml"),
            "[package]\nname = \"demo\"\n\n[dependencies]\nclap = \"4\"\nserde = \"1\"\n",
        )
        .unwrap();
        fs::write(
            root.join("src/main.rs"),
            "use clap::Parser;\n\nfn main() {\n    println!(\"demo\");\n}\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_analyze_project_basics() {
        let dir = demo_project();
        let summary = analyze_project(dir.path()).unwrap();

        assert!(summary.total_files > 0);
        assert!(summary.total_lines > 0);
        assert_eq!(summary.primary_language.as_deref(), Some("Rust"));
        assert!(summary.languages.contains_key("Rust"));
        assert!(summary.dependencies.contains(&"clap".to_string()));
        assert!(summary.frameworks.iter().any(|f| f == "Rust/Cargo"));
        assert!(summary.readme_excerpt.starts_with("# Demo"));
    }

    #[test]
    fn test_prompt_context_mentions_key_facts() {
        let dir = demo_project();
        let summary = analyze_project(dir.path()).unwrap();

        assert!(summary.prompt_context.contains("# Project:"));
        assert!(summary.prompt_context.contains("Primary language: Rust"));
        assert!(summary.prompt_context.contains("## README (excerpt)"));
        assert!(summary.prompt_context.contains("## File tree"));
        assert!(summary.prompt_context.contains("src/main.rs"));
    }

    #[test]
    fn test_prompt_context_not_serialized() {
        let dir = demo_project();
        let summary = analyze_project(dir.path()).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("prompt_context").is_none());
        assert!(json.get("readme_excerpt").is_some());
    }
}
