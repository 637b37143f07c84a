//! Dash-rule block splitting

use regex::Regex;
use std::sync::LazyLock;

/// A run of 40 or more dashes separates compilation attempts in a log file.
static BLOCK_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{40,}").unwrap());

/// Split one log file into trimmed, non-empty blocks in source order.
///
/// Content without a separator yields a single block; empty or
/// whitespace-only content yields none.
pub fn split_blocks(content: &str) -> Vec<&str> {
    BLOCK_SEPARATOR
        .split(content)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: &str = "----------------------------------------";

    #[test]
    fn test_no_separator_yields_trimmed_input() {
        let blocks = split_blocks("\n  main.c:1:1: error: oops \n\n");
        assert_eq!(blocks, vec!["main.c:1:1: error: oops"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("   \n\t\n").is_empty());
    }

    #[test]
    fn test_splits_in_source_order() {
        let content = format!("first\n{RULE}\nsecond\n{RULE}-----\nthird");
        assert_eq!(split_blocks(&content), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_short_dash_runs_are_not_separators() {
        let short = "-".repeat(39);
        let content = format!("a\n{short}\nb");
        assert_eq!(split_blocks(&content), vec![content.trim()]);
    }

    #[test]
    fn test_whitespace_fragments_between_rules_are_dropped() {
        let content = format!("{RULE}\n\n{RULE}\nonly\n{RULE}\n   ");
        assert_eq!(split_blocks(&content), vec!["only"]);
    }
}
