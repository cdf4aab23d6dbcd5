//! Tag-id resolution for note projections.

use crate::model::note::{EnrichedNote, StoredNote};
use crate::model::tag::Tag;
use std::collections::{HashMap, HashSet};

/// Resolves every note's `tag_ids` against `tags`.
///
/// Ids are walked in `tag_ids` order. A repeated id contributes once, an id
/// shared by several tags yields all of them in collection order, and ids
/// with no matching tag are dropped.
pub fn enrich_notes(notes: &[StoredNote], tags: &[Tag]) -> Vec<EnrichedNote> {
    let mut index: HashMap<&str, Vec<&Tag>> = HashMap::new();
    for tag in tags {
        index.entry(tag.id.as_str()).or_default().push(tag);
    }
    notes.iter().map(|note| enrich_with(note, &index)).collect()
}

fn enrich_with(note: &StoredNote, index: &HashMap<&str, Vec<&Tag>>) -> EnrichedNote {
    let mut seen = HashSet::new();
    let tags = note
        .tag_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| index.get(id.as_str()))
        .flat_map(|matches| matches.iter().map(|tag| (*tag).clone()))
        .collect();

    EnrichedNote {
        id: note.id.clone(),
        title: note.title.clone(),
        markdown: note.markdown.clone(),
        tags,
    }
}
