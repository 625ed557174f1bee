//! Per-wafer yield records

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};

/// Die count for one bin on one wafer.
///
/// `bin_id` is a foreign key with no referential integrity: the bin may
/// have been deleted since the record was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinCount {
    pub id: EntityId,
    pub bin_id: EntityId,
    pub count: u32,
}

impl BinCount {
    pub fn new(bin_id: EntityId, count: u32) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cnt),
            bin_id,
            count,
        }
    }
}

/// Bin counts for a single wafer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldRecord {
    /// Unique identifier
    pub id: EntityId,

    pub wafer_name: String,

    pub lot_number: String,

    /// Counts in entry order
    #[serde(default)]
    pub bin_counts: Vec<BinCount>,

    pub created_at: DateTime<Utc>,
}

impl YieldRecord {
    /// Create a record; see [`validate`](Self::validate) for the rules
    pub fn new(
        wafer_name: impl Into<String>,
        lot_number: impl Into<String>,
        bin_counts: Vec<BinCount>,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            id: EntityId::new(EntityPrefix::Yld),
            wafer_name: wafer_name.into().trim().to_string(),
            lot_number: lot_number.into().trim().to_string(),
            bin_counts,
            created_at: Utc::now(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Wafer name and lot number must not be blank, and there must be at
    /// least one count with no bin counted twice.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.wafer_name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "wafer name",
            });
        }
        if self.lot_number.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "lot number",
            });
        }
        if self.bin_counts.is_empty() {
            return Err(ValidationError::Empty { field: "die counts" });
        }
        let mut seen = HashSet::with_capacity(self.bin_counts.len());
        for count in &self.bin_counts {
            if !seen.insert(count.bin_id) {
                return Err(ValidationError::DuplicateBin {
                    bin_id: count.bin_id.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Entity for YieldRecord {
    const PREFIX: EntityPrefix = EntityPrefix::Yld;
    const COLLECTION_KEY: &'static str = "yieldRecords";
    const KIND: &'static str = "yield record";

    fn id(&self) -> &EntityId {
        &self.id
    }
}
