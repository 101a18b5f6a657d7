//! Markdown cleanup for Medium publishing.
//!
//! Medium's importer renders a blank line between list items as an empty
//! extra item (lists showing 2., 4., 6.), so list runs must be compacted.
//! Code fences are left untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*[-*+]\s|\s*\d+[.)]\s)").expect("valid list regex"));
static EXCESS_BLANKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{4,}").expect("valid blank-run regex"));
static TRAILING_FENCE_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[ \t]+\n").expect("valid fence regex"));

fn is_list_item(line: &str) -> bool {
    LIST_ITEM.is_match(line)
}

/// Remove blank lines between consecutive list items.
pub fn fix_list_spacing(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut result: Vec<&str> = Vec::with_capacity(lines.len());
    let mut in_code_block = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().starts_with("```") {
            in_code_block = !in_code_block;
            result.push(line);
            i += 1;
            continue;
        }
        if in_code_block || !is_list_item(line) {
            result.push(line);
            i += 1;
            continue;
        }

        result.push(line);
        // Skip blank lines only when the next non-blank line is another
        // list item; a blank run before prose stays.
        let mut j = i + 1;
        while j < lines.len() && lines[j].trim().is_empty() {
            j += 1;
        }
        if j < lines.len() && is_list_item(lines[j]) {
            i = j;
        } else {
            i += 1;
        }
    }

    result.join("\n")
}

/// Full cleanup pass applied before export: collapse excessive blank
/// runs, strip trailing whitespace on fence lines, compact lists.
pub fn clean_markdown(markdown: &str) -> String {
    let collapsed = EXCESS_BLANKS.replace_all(markdown, "\n\n\n");
    let fenced = TRAILING_FENCE_WS.replace_all(&collapsed, "```\n");
    fix_list_spacing(&fenced).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_between_items_removed() {
        let input = "Intro:\n\n1. First\n\n2. Second\n\n3. Third\n\nOutro.";
        let fixed = fix_list_spacing(input);
        assert_eq!(fixed, "Intro:\n\n1. First\n2. Second\n3. Third\n\nOutro.");
    }

    #[test]
    fn test_bulleted_lists_compact_too() {
        let input = "- one\n\n- two\n\n* three";
        assert_eq!(fix_list_spacing(input), "- one\n- two\n* three");
    }

    #[test]
    fn test_blank_line_after_last_item_kept() {
        let input = "- only item\n\nA paragraph after.";
        assert_eq!(fix_list_spacing(input), input);
    }

    #[test]
    fn test_code_blocks_untouched() {
        let input = "```python\n- not a list\n\n- still code\n```\n\n- real item\n\n- another";
        let fixed = fix_list_spacing(input);
        assert!(fixed.contains("- not a list\n\n- still code"));
        assert!(fixed.ends_with("- real item\n- another"));
    }

    #[test]
    fn test_clean_markdown_collapses_blank_runs() {
        let input = "a\n\n\n\n\n\nb";
        assert_eq!(clean_markdown(input), "a\n\n\nb");
    }
}
