//! Shared helper functions for CLI commands

use std::sync::Arc;

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::numeric::parse_value;
use crate::core::shortid::ShortIdIndex;
use crate::core::store::{FileStore, SharedStore};

/// Everything a command needs: configuration, the store and the alias index
pub struct Workspace {
    pub config: Config,
    pub store: SharedStore,
    pub short_ids: ShortIdIndex,
}

impl Workspace {
    /// Load the config and open the data directory
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load();
        let data_dir = config.resolve_data_dir(global.data_dir.as_deref());
        log::debug!("using data directory {}", data_dir.display());
        let store: SharedStore = Arc::new(FileStore::open(data_dir)?);
        let short_ids = ShortIdIndex::load(&store);
        Ok(Self {
            config,
            store,
            short_ids,
        })
    }

    /// Resolve `SPEC@1`, `1`, `@1` or a full id to a record id
    pub fn resolve(&self, prefix: EntityPrefix, reference: &str) -> Result<EntityId> {
        Ok(self.short_ids.resolve_as(prefix, reference)?)
    }

    /// Assign aliases to `ids` and persist the index
    pub fn remember(&mut self, ids: impl IntoIterator<Item = EntityId>) -> Result<()> {
        self.short_ids.extend(ids);
        self.short_ids.save(&self.store)?;
        Ok(())
    }

    /// Alias for display (full id if none assigned)
    pub fn alias(&self, id: &EntityId) -> String {
        self.short_ids.display(id)
    }

    /// Format a number at the configured precision
    pub fn num(&self, value: f64) -> String {
        format_number(value, self.config.decimals)
    }
}

/// Fixed-precision number formatting
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Format a percentage with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Split a `NAME=VALUE` argument
pub fn split_pair(input: &str) -> Result<(String, String), ValidationError> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ValidationError::Empty { field: "name" }),
    }
}

/// Parse a `NAME=SECONDS` argument
pub fn parse_named_value(input: &str) -> Result<(String, f64), ValidationError> {
    let (name, value) = split_pair(input)?;
    Ok((name, parse_value(&value)?))
}

/// Parse a non-negative whole count
pub fn parse_count(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(ValidationError::Negative { field: "count" });
    }
    trimmed.parse().map_err(|_| ValidationError::NotANumber {
        input: input.to_string(),
    })
}
