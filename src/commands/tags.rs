//! Tags command - List tags by how often they are used

use crate::bookmarks::{count_tags, Bookmark, TagCount};

/// Execute the tags command and return formatted output
pub fn execute(bookmarks: &[Bookmark]) -> String {
    format_tags(&count_tags(bookmarks))
}

/// Format tag counts for display
pub fn format_tags(counts: &[TagCount]) -> String {
    if counts.is_empty() {
        return "No tags found.".to_string();
    }

    let mut lines = vec!["Tags sorted by count:".to_string()];
    lines.extend(counts.iter().map(|c| format!("{}: {}", c.tag, c.count)));
    lines.join("\n")
}
