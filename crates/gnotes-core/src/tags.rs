//! Tag handling.
//!
//! Tags are not stored as entities. They live on each note as an ordered,
//! duplicate-free list of non-empty strings, and every count shown to the
//! user is derived by scanning the current note collection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Note;

/// A tag and the number of notes carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Trim a raw tag; empty input yields `None`.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Append `raw` to `tags` unless it is blank or already present.
///
/// Returns `true` when the list changed.
pub fn add_tag(tags: &mut Vec<String>, raw: &str) -> bool {
    match normalize_tag(raw) {
        Some(tag) if !tags.contains(&tag) => {
            tags.push(tag);
            true
        }
        _ => false,
    }
}

/// Remove `tag` from `tags`. Returns `true` when it was present.
pub fn remove_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let before = tags.len();
    tags.retain(|t| t != tag);
    tags.len() != before
}

/// Normalize and de-duplicate, keeping first-seen order.
pub fn sanitize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = Vec::new();
    for tag in raw {
        add_tag(&mut tags, tag.as_ref());
    }
    tags
}

/// Notes whose tag list contains `tag`; `None` selects every note.
pub fn filter_by_tag<'a>(notes: &'a [Note], tag: Option<&str>) -> Vec<&'a Note> {
    match tag {
        Some(tag) => notes.iter().filter(|n| n.has_tag(tag)).collect(),
        None => notes.iter().collect(),
    }
}

/// Count notes per tag.
///
/// Sorted by descending count; ties keep the order in which tags first
/// appear in the collection.
pub fn tag_counts(notes: &[Note]) -> Vec<TagCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for note in notes {
        for tag in &note.tags {
            let entry = counts.entry(tag.as_str()).or_insert_with(|| {
                order.push(tag.as_str());
                0
            });
            *entry += 1;
        }
    }

    let mut result: Vec<TagCount> = order
        .into_iter()
        .map(|tag| TagCount {
            tag: tag.to_string(),
            count: counts[tag],
        })
        .collect();
    // sort_by is stable, so first-appearance order survives ties
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// The `limit` most used tags.
pub fn top_tags(notes: &[Note], limit: usize) -> Vec<TagCount> {
    let mut counts = tag_counts(notes);
    counts.truncate(limit);
    counts
}
