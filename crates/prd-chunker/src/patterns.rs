//! Line-level patterns shared by the parser, the structure detector and
//! the metadata enricher.

use once_cell::sync::Lazy;
use regex::Regex;

/// ATX heading with 1-4 markers: `## Title`
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,4})[ \t]+(.*)$").expect("valid heading regex"));

/// Bullet (`-`, `*`, `+`) or ordinal (`1.`, `1)`) list marker
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+").expect("valid list regex"));

/// Requirement identifier anywhere in text: R1, NR12, SC3, C4, FR2, NFR7
pub(crate) static REQUIREMENT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:NFR|NR|FR|SC|R|C)\d+").expect("valid requirement id regex")
});

/// A block that opens a new numbered requirement: `**R1. Login**`, `### NR2. Latency`
static REQUIREMENT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#{1,6}[ \t]+)?(?:\*\*|__)?[ \t]*(?:NFR|NR|FR|SC|R|C)\d+\.")
        .expect("valid requirement start regex")
});

/// Heading depth and title when `line` is a heading
pub(crate) fn heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let title = caps.get(2).map_or("", |m| m.as_str());
    Some((level, clean_heading_title(title)))
}

/// Title without surrounding whitespace and optional closing `#`s
fn clean_heading_title(title: &str) -> &str {
    let trimmed = title.trim();
    let without_closer = trimmed.trim_end_matches('#');
    if without_closer.len() == trimmed.len() {
        return trimmed;
    }
    // A closing sequence only counts when separated by whitespace
    if without_closer.is_empty() || without_closer.ends_with([' ', '\t']) {
        without_closer.trim_end()
    } else {
        trimmed
    }
}

pub(crate) fn is_list_item(line: &str) -> bool {
    LIST_ITEM.is_match(line)
}

/// Opening fence marker (```` ``` ```` or `~~~`) when `line` starts a code block
pub(crate) fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

pub(crate) fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Markdown table header separator: `|---|:---:|---:|`
pub(crate) fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') || !trimmed.contains('-') {
        return false;
    }
    trimmed
        .trim_matches('|')
        .split('|')
        .all(|cell| {
            let cell = cell.trim();
            let dashes = cell.trim_start_matches(':').trim_end_matches(':');
            !dashes.is_empty() && dashes.chars().all(|c| c == '-')
        })
}

/// Requirement ids in order of appearance (duplicates kept)
pub(crate) fn requirement_ids(text: &str) -> impl Iterator<Item = &str> {
    REQUIREMENT_ID.find_iter(text).filter_map(move |m| {
        // `R2D2` or `C4ISR` are not requirement ids
        let followed_by_letter = text[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        (!followed_by_letter).then(|| m.as_str())
    })
}

pub(crate) fn has_requirement_id(text: &str) -> bool {
    requirement_ids(text).next().is_some()
}

pub(crate) fn starts_requirement(text: &str) -> bool {
    REQUIREMENT_START.is_match(text.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading("# Title"), Some((1, "Title")));
        assert_eq!(heading("#### Deep  "), Some((4, "Deep")));
        assert_eq!(heading("## Closed ##"), Some((2, "Closed")));
        assert_eq!(heading("## C#"), Some((2, "C#")));
        assert_eq!(heading("##### Too deep"), None);
        assert_eq!(heading("#hashtag"), None);
        assert_eq!(heading(" # indented"), None);
    }

    #[test]
    fn test_list_items() {
        assert!(is_list_item("- item"));
        assert!(is_list_item("  * nested"));
        assert!(is_list_item("12. ordinal"));
        assert!(is_list_item("3) paren"));
        assert!(!is_list_item("**R1. Bold**"));
        assert!(!is_list_item("---"));
        assert!(!is_list_item("plain text"));
    }

    #[test]
    fn test_table_separator() {
        assert!(is_table_separator("|---|---|"));
        assert!(is_table_separator("| :--- | ---: | :-: |"));
        assert!(is_table_separator("  |---|"));
        assert!(!is_table_separator("| a | b |"));
        assert!(!is_table_separator("|---| x |"));
        assert!(!is_table_separator("---"));
    }

    #[test]
    fn test_fence_markers() {
        assert_eq!(fence_marker("```rust"), Some("```"));
        assert_eq!(fence_marker("  ~~~"), Some("~~~"));
        assert_eq!(fence_marker("``inline``"), None);
    }

    #[test]
    fn test_requirement_ids() {
        let ids: Vec<_> = requirement_ids("R1, NR12 and SC3; see C4 or R2D2").collect();
        assert_eq!(ids, vec!["R1", "NR12", "SC3", "C4"]);
        assert!(!has_requirement_id("Release notes for HR"));
    }

    #[test]
    fn test_requirement_start() {
        assert!(starts_requirement("**R1. Login** must work"));
        assert!(starts_requirement("### NR2. Latency"));
        assert!(starts_requirement("SC10. Encrypt"));
        assert!(!starts_requirement("See R1. for details"));
        assert!(!starts_requirement("**R1 Login**"));
    }
}
