//! Tag frequency index

use std::collections::HashMap;

use super::Bookmark;

/// Number of bookmarks carrying a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Count tag occurrences across all bookmarks
///
/// Sorted by count, highest first. Equal counts keep the order in which the
/// tags were first seen.
pub fn count_tags(bookmarks: &[Bookmark]) -> Vec<TagCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagCount> = Vec::new();

    for tag in bookmarks.iter().flat_map(|b| b.tag_list()) {
        match index.get(tag) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(tag, counts.len());
                counts.push(TagCount {
                    tag: tag.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, which keeps first-seen order for ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
