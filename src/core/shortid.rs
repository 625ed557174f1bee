//! Short ID system for easier record selection
//!
//! Assigns stable per-prefix aliases such as `SPEC@1` or `DS@3` so that ids
//! don't have to be copied off the screen. Aliases are persisted in the
//! blob store under `shortIds` and assigned when records are listed or
//! created. An alias is never reused, even after its record is deleted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StoreError, ToolkitError};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::store::SharedStore;

/// Blob store key for the index
pub const INDEX_KEY: &str = "shortIds";

/// A mapping of `PREFIX@N` aliases to full ids
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortIdIndex {
    /// "SPEC@1" -> SPEC-01ABC...
    entries: HashMap<String, EntityId>,
    /// Reverse lookup, rebuilt on load
    #[serde(skip)]
    reverse: HashMap<EntityId, String>,
    /// Next free number per prefix
    next_ids: HashMap<String, u32>,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from the store, or start empty if absent or unreadable
    pub fn load(store: &SharedStore) -> Self {
        let decoded = match store.load(INDEX_KEY) {
            Ok(Some(blob)) => serde_json::from_slice::<ShortIdIndex>(&blob).map_err(|source| {
                StoreError::Decode {
                    key: INDEX_KEY.to_string(),
                    source,
                }
            }),
            Ok(None) => return Self::new(),
            Err(e) => Err(e),
        };
        match decoded {
            Ok(mut index) => {
                index.reverse = index
                    .entries
                    .iter()
                    .map(|(alias, id)| (*id, alias.clone()))
                    .collect();
                index
            }
            Err(e) => {
                log::warn!("{}; short ids will be reassigned", e);
                Self::new()
            }
        }
    }

    /// Save the index to the store
    pub fn save(&self, store: &SharedStore) -> Result<()> {
        let blob = serde_json::to_vec(self).map_err(StoreError::Encode)?;
        store.save(INDEX_KEY, &blob)?;
        Ok(())
    }

    /// Assign an alias to `id` if it has none; returns the alias
    pub fn add(&mut self, id: EntityId) -> String {
        if let Some(existing) = self.reverse.get(&id) {
            return existing.clone();
        }
        let next = self
            .next_ids
            .entry(id.prefix().as_str().to_string())
            .or_insert(1);
        let alias = format!("{}@{}", id.prefix(), next);
        *next += 1;
        self.entries.insert(alias.clone(), id);
        self.reverse.insert(id, alias.clone());
        alias
    }

    /// Assign aliases to every id, in order
    pub fn extend(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        for id in ids {
            self.add(id);
        }
    }

    /// Alias previously assigned to `id`
    pub fn alias(&self, id: &EntityId) -> Option<&str> {
        self.reverse.get(id).map(String::as_str)
    }

    /// Alias if assigned, else the full id
    pub fn display(&self, id: &EntityId) -> String {
        self.alias(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    /// Resolve a reference to a full id.
    ///
    /// Accepts `PREFIX@N` (case-insensitive prefix) or a full `PREFIX-ULID`.
    pub fn resolve(&self, reference: &str) -> Result<EntityId> {
        let reference = reference.trim();
        if let Some((prefix, number)) = reference.split_once('@') {
            let prefix: EntityPrefix = prefix.parse()?;
            let alias = format!("{}@{}", prefix, number);
            return self
                .entries
                .get(&alias)
                .copied()
                .ok_or_else(|| ToolkitError::NotFound {
                    kind: "short id",
                    id: reference.to_string(),
                });
        }
        Ok(reference.parse()?)
    }

    /// Resolve a reference that must name a record of type `prefix`.
    ///
    /// Besides the forms [`resolve`](Self::resolve) takes, a bare number
    /// `N` or `@N` is read as `PREFIX@N`.
    pub fn resolve_as(&self, prefix: EntityPrefix, reference: &str) -> Result<EntityId> {
        let reference = reference.trim();
        let number = reference.strip_prefix('@').unwrap_or(reference);
        let id = if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
            self.resolve(&format!("{}@{}", prefix, number))?
        } else {
            self.resolve(reference)?
        };
        if id.prefix() != prefix {
            return Err(ToolkitError::NotFound {
                kind: prefix.kind(),
                id: reference.to_string(),
            });
        }
        Ok(id)
    }

    /// Number of aliases ever assigned and still indexed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
