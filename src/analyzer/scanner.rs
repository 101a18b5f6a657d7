//! Project tree scanner.
//!
//! Walks a project directory with gitignore awareness and returns the text
//! source files worth feeding into analysis. Vendored/build directories
//! and binary blobs are always skipped.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use super::language::Language;

/// Directories skipped regardless of .gitignore contents.
const ALWAYS_SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    "venv",
    ".venv",
    "env",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "target",
    ".gradle",
    ".idea",
    ".vscode",
    "vendor",
    "Pods",
    ".eggs",
];

/// Extensions treated as binary or otherwise useless as text context.
const BINARY_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".webp", ".mp3", ".mp4", ".avi",
    ".mov", ".wav", ".flac", ".zip", ".tar", ".gz", ".bz2", ".rar", ".7z", ".exe", ".dll", ".so",
    ".dylib", ".bin", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".woff",
    ".woff2", ".ttf", ".eot", ".otf", ".pyc", ".pyo", ".class", ".o", ".obj", ".db", ".sqlite",
    ".sqlite3", ".lock",
];

/// Files larger than this are skipped outright.
const MAX_FILE_SIZE: u64 = 512 * 1024;

/// One scanned source file.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the scanned root, forward slashes
    pub relative_path: String,
    /// Lowercased extension including the leading dot, or empty
    pub extension: String,
    /// Detected language, filled in by `assign_languages`
    pub language: Option<Language>,
    pub line_count: usize,
    pub size_bytes: u64,
}

fn is_skipped_dir(name: &str) -> bool {
    ALWAYS_SKIP_DIRS.contains(&name) || name.starts_with('.')
}

/// Walk the project tree and return a `FileInfo` per text source file,
/// sorted by relative path for deterministic output.
pub fn scan_project(root: &Path) -> anyhow::Result<Vec<FileInfo>> {
    let root = root.canonicalize()?;
    let mut results = Vec::new();

    let walker = WalkBuilder::new(&root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
            // Keep the root itself; prune skipped directories early.
            entry.depth() == 0 || !(is_dir && is_skipped_dir(&name))
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().map_or(false, |t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let relative_path = match path.strip_prefix(&root) {
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };

        // Hidden files at any level are not useful context.
        if relative_path.split('/').any(|part| part.starts_with('.') && part.len() > 1) {
            continue;
        }

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        if BINARY_EXTENSIONS.contains(&extension.as_str()) {
            continue;
        }

        let size_bytes = match path.metadata() {
            Ok(meta) => meta.len(),
            Err(_) => continue,
        };
        if size_bytes == 0 || size_bytes > MAX_FILE_SIZE {
            continue;
        }

        let line_count = match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut count = content.matches('\n').count();
                if !content.is_empty() && !content.ends_with('\n') {
                    count += 1;
                }
                count
            }
            // Unreadable as UTF-8 means effectively binary.
            Err(_) => continue,
        };

        results.push(FileInfo {
            path: path.to_path_buf(),
            relative_path,
            extension,
            language: None,
            line_count,
            size_bytes,
        });
    }

    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_counts_lines_and_skips_vendored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.rs", "fn main() {}\n// two lines\n");
        write(dir.path(), "node_modules/pkg/index.js", "ignored\n");
        write(dir.path(), "target/debug/out.rs", "ignored\n");
        write(dir.path(), "README.md", "# Demo\n");

        let files = scan_project(dir.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert!(paths.contains(&"src/main.rs"));
        assert!(paths.contains(&"README.md"));
        assert!(!paths.iter().any(|p| p.starts_with("node_modules")));
        assert!(!paths.iter().any(|p| p.starts_with("target")));

        let main = files.iter().find(|f| f.relative_path == "src/main.rs").unwrap();
        assert_eq!(main.line_count, 2);
        assert_eq!(main.extension, ".rs");
    }

    #[test]
    fn test_scan_skips_empty_and_binary() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "empty.txt", "");
        write(dir.path(), "logo.png", "not really a png");
        write(dir.path(), "app.py", "print('hi')\n");

        let files = scan_project(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "app.py");
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".gitignore", "generated/\n");
        write(dir.path(), "generated/out.js", "ignored\n");
        write(dir.path(), "index.js", "console.log(1)\n");

        let files = scan_project(dir.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert!(paths.contains(&"index.js"));
        assert!(!paths.iter().any(|p| p.starts_with("generated")));
    }

    #[test]
    fn test_scan_deterministic_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.rs", "fn b() {}\n");
        write(dir.path(), "a.rs", "fn a() {}\n");

        let files = scan_project(dir.path()).unwrap();
        assert_eq!(files[0].relative_path, "a.rs");
        assert_eq!(files[1].relative_path, "b.rs");
    }
}
