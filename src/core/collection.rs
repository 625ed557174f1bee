//! Persisted record collections
//!
//! A [`Collection`] is a flat, ordered `Vec` of records that is written back
//! to the blob store, whole, after every mutation. Loading never fails:
//! a missing or undecodable blob yields an empty (or seeded) collection.

use crate::core::entity::Entity;
use crate::core::error::{Result, StoreError, ToolkitError};
use crate::core::identity::EntityId;
use crate::core::store::SharedStore;

/// Ordered, persisted list of records of one type
pub struct Collection<T: Entity> {
    items: Vec<T>,
    store: SharedStore,
}

impl<T: Entity> Collection<T> {
    /// Load the collection stored under `T::COLLECTION_KEY`.
    ///
    /// Read errors and decode errors are logged and treated as "absent".
    pub fn load(store: SharedStore) -> Self {
        let items = match read_blob::<T>(&store) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("{}; starting with an empty collection", e);
                Vec::new()
            }
        };
        log::debug!("loaded {} {} record(s)", items.len(), T::COLLECTION_KEY);
        Self { items, store }
    }

    /// Load the collection, seeding it with `seed()` when it comes back empty.
    ///
    /// The seeded state is flushed immediately so the next load sees it.
    pub fn load_or_seed(store: SharedStore, seed: impl FnOnce() -> Vec<T>) -> Result<Self> {
        let mut collection = Self::load(store);
        if collection.items.is_empty() {
            collection.items = seed();
            if !collection.items.is_empty() {
                log::info!(
                    "seeded {} default {} record(s)",
                    collection.items.len(),
                    T::COLLECTION_KEY
                );
                collection.flush()?;
            }
        }
        Ok(collection)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Index of the record with `id`
    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Append a record and flush
    pub fn add(&mut self, item: T) -> Result<()> {
        self.items.push(item);
        self.flush()
    }

    /// Replace the record with the same id, in place, and flush
    pub fn update(&mut self, item: T) -> Result<()> {
        let index = self.position(item.id()).ok_or_else(|| ToolkitError::NotFound {
            kind: T::KIND,
            id: item.id().to_string(),
        })?;
        self.items[index] = item;
        self.flush()
    }

    /// Remove the record at `index` and flush
    pub fn delete_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(ToolkitError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        self.flush()?;
        Ok(removed)
    }

    /// Remove the record with `id` and flush
    pub fn delete(&mut self, id: &EntityId) -> Result<T> {
        let index = self.position(id).ok_or_else(|| ToolkitError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        })?;
        self.delete_at(index)
    }

    /// Write the full collection to the store
    pub fn flush(&self) -> Result<()> {
        let blob = serde_json::to_vec(&self.items).map_err(StoreError::Encode)?;
        self.store.save(T::COLLECTION_KEY, &blob)?;
        log::debug!("flushed {} {} record(s)", self.items.len(), T::COLLECTION_KEY);
        Ok(())
    }
}

fn read_blob<T: Entity>(store: &SharedStore) -> std::result::Result<Option<Vec<T>>, StoreError> {
    let Some(blob) = store.load(T::COLLECTION_KEY)? else {
        return Ok(None);
    };
    serde_json::from_slice(&blob)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            key: T::COLLECTION_KEY.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use crate::core::store::{BlobStore, MemoryStore};
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: EntityId,
        text: String,
    }

    impl Note {
        fn new(text: &str) -> Self {
            Self {
                id: EntityId::new(EntityPrefix::Ds),
                text: text.to_string(),
            }
        }
    }

    impl Entity for Note {
        const PREFIX: EntityPrefix = EntityPrefix::Ds;
        const COLLECTION_KEY: &'static str = "notes";
        const KIND: &'static str = "note";

        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    #[test]
    fn test_add_persists_immediately() {
        let store = MemoryStore::shared();
        let mut notes: Collection<Note> = Collection::load(store.clone());
        notes.add(Note::new("first")).unwrap();

        let reloaded: Collection<Note> = Collection::load(store);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.items()[0].text, "first");
    }

    #[test]
    fn test_update_in_place_keeps_order() {
        let store = MemoryStore::shared();
        let mut notes: Collection<Note> = Collection::load(store);
        let a = Note::new("a");
        let b = Note::new("b");
        notes.add(a.clone()).unwrap();
        notes.add(b.clone()).unwrap();

        let mut edited = a.clone();
        edited.text = "a2".to_string();
        notes.update(edited).unwrap();

        assert_eq!(notes.items()[0].text, "a2");
        assert_eq!(notes.items()[1].id, b.id);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut notes: Collection<Note> = Collection::load(MemoryStore::shared());
        let err = notes.update(Note::new("ghost")).unwrap_err();
        assert!(matches!(err, ToolkitError::NotFound { kind: "note", .. }));
    }

    #[test]
    fn test_delete_at_out_of_bounds_fails_loudly() {
        let mut notes: Collection<Note> = Collection::load(MemoryStore::shared());
        notes.add(Note::new("only")).unwrap();

        let err = notes.delete_at(3).unwrap_err();
        assert!(matches!(
            err,
            ToolkitError::IndexOutOfBounds { index: 3, len: 1 }
        ));
        assert_eq!(notes.len(), 1);

        let removed = notes.delete_at(0).unwrap();
        assert_eq!(removed.text, "only");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_delete_by_id() {
        let mut notes: Collection<Note> = Collection::load(MemoryStore::shared());
        let n = Note::new("x");
        notes.add(n.clone()).unwrap();
        notes.delete(&n.id).unwrap();
        assert!(notes.get(&n.id).is_none());
        assert!(notes.delete(&n.id).is_err());
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_empty() {
        let store = Arc::new(MemoryStore::new());
        store.save("notes", b"{not json").unwrap();

        let notes: Collection<Note> = Collection::load(store);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_seed_only_when_empty() {
        let store = MemoryStore::shared();
        let seeded: Collection<Note> =
            Collection::load_or_seed(store.clone(), || vec![Note::new("default")]).unwrap();
        assert_eq!(seeded.len(), 1);

        // Second load sees the persisted seed and does not reseed
        let again: Collection<Note> =
            Collection::load_or_seed(store, || vec![Note::new("x"), Note::new("y")]).unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(again.items()[0].text, "default");
    }

    #[test]
    fn test_reload_without_changes_is_identical() {
        let store = MemoryStore::shared();
        let mut notes: Collection<Note> = Collection::load(store.clone());
        notes.add(Note::new("one")).unwrap();
        notes.add(Note::new("two")).unwrap();

        let first: Collection<Note> = Collection::load(store.clone());
        first.flush().unwrap();
        let second: Collection<Note> = Collection::load(store);
        assert_eq!(first.items(), second.items());
    }
}
