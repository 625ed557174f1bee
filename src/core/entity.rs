//! Entity trait - common interface for all stored record types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// Common trait for every record kept in a [`Collection`](crate::core::collection::Collection)
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// The id prefix for this record type (e.g. `SPEC`)
    const PREFIX: EntityPrefix;

    /// Blob store key the collection of this type is persisted under
    const COLLECTION_KEY: &'static str;

    /// Human-readable kind, used in error messages
    const KIND: &'static str;

    /// Get the record's unique ID
    fn id(&self) -> &EntityId;
}
