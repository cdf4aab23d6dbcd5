//! Note domain model and list filter.
//!
//! # Responsibility
//! - `StoredNote`: persisted record, tags referenced by id.
//! - `NoteData`: create/update payload carrying full tag objects.
//! - `EnrichedNote`: read projection with tag ids resolved.
//! - `NoteFilter`: list-page filter over enriched notes.
//!
//! # Invariants
//! - `StoredNote` serializes with the field names `id`, `title`,
//!   `markdown`, `tagIds` so persisted slots stay readable by other clients.
//! - `tag_ids` order follows caller input; duplicates are not removed.

use crate::model::tag::{Tag, TagId};
use serde::{Deserialize, Serialize};

/// Stable identifier for a note, minted by an `IdSupplier`.
pub type NoteId = String;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNote {
    pub id: NoteId,
    pub title: String,
    pub markdown: String,
    /// Referenced tag ids. Ids without a matching tag are kept as-is.
    #[serde(rename = "tagIds")]
    pub tag_ids: Vec<TagId>,
}

impl StoredNote {
    /// Builds a stored record from caller input, keeping tag order.
    pub fn from_data(id: impl Into<NoteId>, data: NoteData) -> Self {
        let tag_ids = data.tag_ids();
        Self {
            id: id.into(),
            title: data.title,
            markdown: data.markdown,
            tag_ids,
        }
    }

    /// Replaces title, markdown and tag ids; `id` is untouched.
    pub fn apply(&mut self, data: NoteData) {
        self.tag_ids = data.tag_ids();
        self.title = data.title;
        self.markdown = data.markdown;
    }
}

/// Create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

impl NoteData {
    pub fn new(title: impl Into<String>, markdown: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            tags,
        }
    }

    /// Tag ids in input order.
    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id.clone()).collect()
    }
}

/// Read projection of a note with its tags resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedNote {
    pub id: NoteId,
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

impl EnrichedNote {
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

/// Filter for note list queries.
///
/// - `title`: case-insensitive substring; `None` or blank matches all.
/// - `tag_ids`: a note matches only if it carries every listed tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub title: Option<String>,
    pub tag_ids: Vec<TagId>,
}

impl NoteFilter {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tag(mut self, tag_id: impl Into<TagId>) -> Self {
        self.tag_ids.push(tag_id.into());
        self
    }

    /// Returns whether `note` passes both the title and tag criteria.
    pub fn matches(&self, note: &EnrichedNote) -> bool {
        let title_ok = match self.title.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => note
                .title
                .to_lowercase()
                .contains(needle.to_lowercase().as_str()),
        };

        title_ok && self.tag_ids.iter().all(|tag_id| note.has_tag(tag_id))
    }
}

#[cfg(test)]
mod tests {
    use super::{EnrichedNote, NoteData, NoteFilter, StoredNote};
    use crate::model::tag::Tag;

    fn enriched(title: &str, tags: &[(&str, &str)]) -> EnrichedNote {
        EnrichedNote {
            id: "n1".to_string(),
            title: title.to_string(),
            markdown: String::new(),
            tags: tags.iter().map(|(id, label)| Tag::new(*id, *label)).collect(),
        }
    }

    #[test]
    fn stored_note_serializes_tag_ids_in_camel_case() {
        let note = StoredNote::from_data(
            "n1",
            NoteData::new("A", "x", vec![Tag::new("t2", "b"), Tag::new("t1", "a")]),
        );
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["tagIds"], serde_json::json!(["t2", "t1"]));
        assert!(json.get("tag_ids").is_none());
    }

    #[test]
    fn apply_keeps_id_and_replaces_everything_else() {
        let mut note = StoredNote::from_data("n1", NoteData::new("A", "x", vec![]));
        note.apply(NoteData::new("B", "y", vec![Tag::new("t1", "work")]));
        assert_eq!(note.id, "n1");
        assert_eq!(note.title, "B");
        assert_eq!(note.markdown, "y");
        assert_eq!(note.tag_ids, vec!["t1".to_string()]);
    }

    #[test]
    fn filter_title_is_case_insensitive_and_blank_matches_all() {
        let note = enriched("Weekly Review", &[]);
        assert!(NoteFilter::default().matches(&note));
        assert!(NoteFilter::default().with_title("  ").matches(&note));
        assert!(NoteFilter::default().with_title("REVIEW").matches(&note));
        assert!(!NoteFilter::default().with_title("daily").matches(&note));
    }

    #[test]
    fn filter_requires_every_tag() {
        let note = enriched("A", &[("t1", "work"), ("t2", "home")]);
        assert!(NoteFilter::default().with_tag("t1").matches(&note));
        assert!(NoteFilter::default()
            .with_tag("t1")
            .with_tag("t2")
            .matches(&note));
        assert!(!NoteFilter::default()
            .with_tag("t1")
            .with_tag("t3")
            .matches(&note));
    }
}
