//! Note/tag store.
//!
//! # Responsibility
//! - Own the authoritative note and tag collections for one session.
//! - Persist each collection through `SlotRepository` after every effective
//!   mutation.
//! - Serve the enriched note view, memoized on collection revisions.
//!
//! # Invariants
//! - Note ids and tag ids are unique within their collection.
//! - Collections are replaced wholesale (copy-on-write); snapshots handed
//!   out earlier never observe later mutations.
//! - A collection is swapped in memory only after its slot write succeeds.
//! - Revisions bump only on effective mutations; unknown-id operations are
//!   silent no-ops that neither persist nor invalidate the view.
//! - Deleting a tag never rewrites any note's `tag_ids`.

use crate::id::IdSupplier;
use crate::kv::KvBackend;
use crate::model::note::{EnrichedNote, NoteData, NoteFilter, NoteId, StoredNote};
use crate::model::tag::{Tag, TagId};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use crate::service::enrich::enrich_notes;
use log::{debug, error, info};
use std::cell::RefCell;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const MAX_ID_ATTEMPTS: u32 = 8;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for note/tag use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// Slot load/save failure.
    Repo(RepoError),
    /// `add_tag` called with an id already present.
    DuplicateTag(TagId),
    /// Id supplier kept returning ids already in use.
    IdCollision { attempts: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::DuplicateTag(id) => write!(f, "tag already exists: {id}"),
            Self::IdCollision { attempts } => {
                write!(f, "id supplier returned taken ids {attempts} times in a row")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

struct EnrichedCache {
    revisions: (u64, u64),
    items: Arc<[EnrichedNote]>,
}

/// Session-owned note/tag store.
///
/// Created once via [`NoteStore::open`] and passed by reference to
/// whatever needs it.
pub struct NoteStore<B: KvBackend, I: IdSupplier> {
    repo: SlotRepository<B>,
    ids: I,
    notes: Arc<Vec<StoredNote>>,
    tags: Arc<Vec<Tag>>,
    notes_revision: u64,
    tags_revision: u64,
    enriched: RefCell<Option<EnrichedCache>>,
}

impl<B: KvBackend, I: IdSupplier> NoteStore<B, I> {
    /// Loads both collections from `backend`.
    ///
    /// # Errors
    /// - `StoreError::Repo` when a slot cannot be read or decoded. No repair
    ///   is attempted.
    pub fn open(backend: B, ids: I) -> StoreResult<Self> {
        let repo = SlotRepository::new(backend);
        let loaded = repo
            .load_notes()
            .and_then(|notes| repo.load_tags().map(|tags| (notes, tags)));
        let (notes, tags) = match loaded {
            Ok(collections) => collections,
            Err(err) => {
                error!(
                    "event=store_open module=store status=error error_code=slot_load_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        info!(
            "event=store_open module=store status=ok notes={} tags={}",
            notes.len(),
            tags.len()
        );
        Ok(Self {
            repo,
            ids,
            notes: Arc::new(notes),
            tags: Arc::new(tags),
            notes_revision: 0,
            tags_revision: 0,
            enriched: RefCell::new(None),
        })
    }

    /// Current stored notes snapshot.
    pub fn notes(&self) -> Arc<Vec<StoredNote>> {
        Arc::clone(&self.notes)
    }

    /// Current tags snapshot.
    pub fn tags(&self) -> Arc<Vec<Tag>> {
        Arc::clone(&self.tags)
    }

    /// `(notes_revision, tags_revision)`; keys the enriched view.
    pub fn revisions(&self) -> (u64, u64) {
        (self.notes_revision, self.tags_revision)
    }

    pub fn backend(&self) -> &B {
        self.repo.backend()
    }

    /// Consumes the store and returns the backend.
    pub fn into_backend(self) -> B {
        self.repo.into_backend()
    }

    /// Creates a note with a freshly minted id.
    ///
    /// Input tags missing from the tag collection are registered first so
    /// the new note's tags resolve.
    pub fn create_note(&mut self, data: NoteData) -> StoreResult<NoteId> {
        let id = mint_unique_id(&mut self.ids, |candidate| {
            self.notes.iter().any(|note| note.id == candidate)
        })?;
        self.register_missing_tags(&data.tags)?;

        let tag_count = data.tags.len();
        let mut next = Vec::with_capacity(self.notes.len() + 1);
        next.extend(self.notes.iter().cloned());
        next.push(StoredNote::from_data(id.clone(), data));
        self.commit_notes(next)?;

        info!("event=note_create module=store status=ok note_id={id} tag_count={tag_count}");
        Ok(id)
    }

    /// Replaces title, markdown and tags of note `id`.
    ///
    /// Returns `false` (and changes nothing) when no note has that id.
    pub fn update_note(&mut self, id: &str, data: NoteData) -> StoreResult<bool> {
        if !self.notes.iter().any(|note| note.id == id) {
            debug!("event=note_update module=store status=noop note_id={id}");
            return Ok(false);
        }
        self.register_missing_tags(&data.tags)?;

        let tag_count = data.tags.len();
        let mut data = Some(data);
        let next = self
            .notes
            .iter()
            .map(|note| {
                let mut note = note.clone();
                if note.id == id {
                    if let Some(data) = data.take() {
                        note.apply(data);
                    }
                }
                note
            })
            .collect();
        self.commit_notes(next)?;

        info!("event=note_update module=store status=ok note_id={id} tag_count={tag_count}");
        Ok(true)
    }

    /// Removes note `id`. Returns `false` when absent.
    pub fn delete_note(&mut self, id: &str) -> StoreResult<bool> {
        if !self.notes.iter().any(|note| note.id == id) {
            debug!("event=note_delete module=store status=noop note_id={id}");
            return Ok(false);
        }

        let next = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();
        self.commit_notes(next)?;

        info!("event=note_delete module=store status=ok note_id={id}");
        Ok(true)
    }

    /// Appends a caller-minted tag.
    ///
    /// # Errors
    /// - `StoreError::DuplicateTag` when the id is already in use.
    pub fn add_tag(&mut self, tag: Tag) -> StoreResult<()> {
        if self.tags.iter().any(|existing| existing.id == tag.id) {
            return Err(StoreError::DuplicateTag(tag.id));
        }

        let tag_id = tag.id.clone();
        let mut next = Vec::with_capacity(self.tags.len() + 1);
        next.extend(self.tags.iter().cloned());
        next.push(tag);
        self.commit_tags(next)?;

        info!("event=tag_add module=store status=ok tag_id={tag_id}");
        Ok(())
    }

    /// Mints an id for `label` and adds the resulting tag.
    pub fn create_tag(&mut self, label: impl Into<String>) -> StoreResult<Tag> {
        let id = mint_unique_id(&mut self.ids, |candidate| {
            self.tags.iter().any(|tag| tag.id == candidate)
        })?;
        let tag = Tag::new(id, label);
        self.add_tag(tag.clone())?;
        Ok(tag)
    }

    /// Renames tag `id` in place. Returns `false` when absent.
    pub fn update_tag_label(&mut self, id: &str, label: impl Into<String>) -> StoreResult<bool> {
        if !self.tags.iter().any(|tag| tag.id == id) {
            debug!("event=tag_update module=store status=noop tag_id={id}");
            return Ok(false);
        }

        let label = label.into();
        let next = self
            .tags
            .iter()
            .map(|tag| {
                if tag.id == id {
                    Tag::new(tag.id.clone(), label.clone())
                } else {
                    tag.clone()
                }
            })
            .collect();
        self.commit_tags(next)?;

        info!("event=tag_update module=store status=ok tag_id={id}");
        Ok(true)
    }

    /// Removes tag `id`. Notes keep the orphaned id in `tag_ids`.
    pub fn delete_tag(&mut self, id: &str) -> StoreResult<bool> {
        if !self.tags.iter().any(|tag| tag.id == id) {
            debug!("event=tag_delete module=store status=noop tag_id={id}");
            return Ok(false);
        }

        let next = self.tags.iter().filter(|tag| tag.id != id).cloned().collect();
        self.commit_tags(next)?;

        info!("event=tag_delete module=store status=ok tag_id={id}");
        Ok(true)
    }

    /// Enriched view of every note, in collection order.
    ///
    /// Recomputed only when either revision moved since the last call;
    /// otherwise the same `Arc` is returned.
    pub fn list_enriched_notes(&self) -> Arc<[EnrichedNote]> {
        let revisions = self.revisions();
        if let Some(cache) = self.enriched.borrow().as_ref() {
            if cache.revisions == revisions {
                return Arc::clone(&cache.items);
            }
        }

        let items: Arc<[EnrichedNote]> = enrich_notes(&self.notes, &self.tags).into();
        debug!(
            "event=enriched_rebuild module=store status=ok notes_revision={} tags_revision={} items={}",
            revisions.0,
            revisions.1,
            items.len()
        );
        *self.enriched.borrow_mut() = Some(EnrichedCache {
            revisions,
            items: Arc::clone(&items),
        });
        items
    }

    /// Enriched view of one note.
    pub fn enriched_note(&self, id: &str) -> Option<EnrichedNote> {
        self.list_enriched_notes()
            .iter()
            .find(|note| note.id == id)
            .cloned()
    }

    /// Enriched notes passing `filter`, in collection order.
    pub fn filter_notes(&self, filter: &NoteFilter) -> Vec<EnrichedNote> {
        self.list_enriched_notes()
            .iter()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect()
    }

    fn register_missing_tags(&mut self, tags: &[Tag]) -> StoreResult<usize> {
        let mut known: HashSet<&str> = self.tags.iter().map(|tag| tag.id.as_str()).collect();
        let missing: Vec<Tag> = tags
            .iter()
            .filter(|tag| known.insert(tag.id.as_str()))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let added = missing.len();
        let mut next = Vec::with_capacity(self.tags.len() + added);
        next.extend(self.tags.iter().cloned());
        next.extend(missing);
        self.commit_tags(next)?;

        info!("event=tag_register module=store status=ok added={added}");
        Ok(added)
    }

    fn commit_notes(&mut self, next: Vec<StoredNote>) -> StoreResult<()> {
        if let Err(err) = self.repo.save_notes(&next) {
            error!(
                "event=slot_write module=store status=error slot=NOTES error={}",
                err
            );
            return Err(err.into());
        }
        self.notes = Arc::new(next);
        self.notes_revision += 1;
        Ok(())
    }

    fn commit_tags(&mut self, next: Vec<Tag>) -> StoreResult<()> {
        if let Err(err) = self.repo.save_tags(&next) {
            error!(
                "event=slot_write module=store status=error slot=TAGS error={}",
                err
            );
            return Err(err.into());
        }
        self.tags = Arc::new(next);
        self.tags_revision += 1;
        Ok(())
    }
}

fn mint_unique_id<I: IdSupplier>(
    ids: &mut I,
    is_taken: impl Fn(&str) -> bool,
) -> StoreResult<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = ids.next_id();
        if !is_taken(candidate.as_str()) {
            return Ok(candidate);
        }
        debug!("event=id_mint module=store status=retry reason=collision");
    }

    error!(
        "event=id_mint module=store status=error attempts={}",
        MAX_ID_ATTEMPTS
    );
    Err(StoreError::IdCollision {
        attempts: MAX_ID_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::NoteStore;
    use crate::id::SequentialIdSupplier;
    use crate::kv::MemoryKvBackend;
    use crate::model::note::NoteData;
    use crate::model::tag::Tag;
    use std::sync::Arc;

    fn store() -> NoteStore<MemoryKvBackend, SequentialIdSupplier> {
        NoteStore::open(MemoryKvBackend::new(), SequentialIdSupplier::new("id")).unwrap()
    }

    #[test]
    fn noop_mutations_keep_revisions() {
        let mut store = store();
        store.add_tag(Tag::new("t1", "work")).unwrap();
        let before = store.revisions();

        assert!(!store.update_note("nope", NoteData::default()).unwrap());
        assert!(!store.delete_note("nope").unwrap());
        assert!(!store.update_tag_label("nope", "x").unwrap());
        assert!(!store.delete_tag("nope").unwrap());
        assert_eq!(store.revisions(), before);
    }

    #[test]
    fn enriched_view_is_memoized_until_a_revision_moves() {
        let mut store = store();
        store
            .create_note(NoteData::new("A", "x", vec![Tag::new("t1", "work")]))
            .unwrap();

        let first = store.list_enriched_notes();
        let second = store.list_enriched_notes();
        assert!(Arc::ptr_eq(&first, &second));

        store.update_tag_label("t1", "office").unwrap();
        let third = store.list_enriched_notes();
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third[0].tags, vec![Tag::new("t1", "office")]);
        assert_eq!(first[0].tags, vec![Tag::new("t1", "work")]);
    }

    #[test]
    fn registering_input_tags_deduplicates_and_keeps_existing_labels() {
        let mut store = store();
        store.add_tag(Tag::new("t1", "work")).unwrap();
        store
            .create_note(NoteData::new(
                "A",
                "x",
                vec![
                    Tag::new("t1", "renamed elsewhere"),
                    Tag::new("t2", "home"),
                    Tag::new("t2", "home"),
                ],
            ))
            .unwrap();

        assert_eq!(
            store.tags().as_slice(),
            &[Tag::new("t1", "work"), Tag::new("t2", "home")]
        );
    }
}
