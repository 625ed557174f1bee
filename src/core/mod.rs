//! Core module - fundamental types and utilities

pub mod collection;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod numeric;
pub mod shortid;
pub mod store;

pub use collection::Collection;
pub use config::{Config, ConfigError};
pub use entity::Entity;
pub use error::{Result, StoreError, ToolkitError, ValidationError};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use numeric::{parse_value, parse_values};
pub use shortid::ShortIdIndex;
pub use store::{BlobStore, FileStore, MemoryStore, SharedStore};
