//! Simple good/defective wafer die calculations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};

/// Die totals for one wafer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaferDieCalculation {
    pub id: EntityId,

    pub wafer_name: String,

    pub lot_number: String,

    pub total_dies: u64,

    pub good_dies: u64,

    pub defective_dies: u64,

    pub created_at: DateTime<Utc>,
}

impl WaferDieCalculation {
    /// Build a calculation from partially entered counts.
    ///
    /// When one of `good`/`defective` is missing it is derived as
    /// `total - other`. The total must be positive and the two counts may
    /// not exceed it.
    pub fn resolve(
        wafer_name: impl Into<String>,
        lot_number: impl Into<String>,
        total: u64,
        good: Option<u64>,
        defective: Option<u64>,
    ) -> Result<Self, ValidationError> {
        let wafer_name = wafer_name.into().trim().to_string();
        let lot_number = lot_number.into().trim().to_string();
        check_names(&wafer_name, &lot_number)?;
        check_total(total)?;

        let (good, defective) = match (good, defective) {
            (Some(g), Some(d)) => (g, d),
            (Some(g), None) => (g, derive_other(total, g, "defective dies")?),
            (None, Some(d)) => (derive_other(total, d, "good dies")?, d),
            (None, None) => return Err(ValidationError::Empty { field: "die counts" }),
        };

        let calc = Self {
            id: EntityId::new(EntityPrefix::Wdc),
            wafer_name,
            lot_number,
            total_dies: total,
            good_dies: good,
            defective_dies: defective,
            created_at: Utc::now(),
        };
        calc.validate()?;
        Ok(calc)
    }

    /// Names must not be blank, the total must be positive and
    /// good + defective may not exceed it
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_names(&self.wafer_name, &self.lot_number)?;
        check_total(self.total_dies)?;
        if self.good_dies.saturating_add(self.defective_dies) > self.total_dies {
            return Err(ValidationError::ExceedsTotal {
                good: self.good_dies,
                defective: self.defective_dies,
                total: self.total_dies,
            });
        }
        Ok(())
    }

    /// Good dies as a percentage of total; 0 when total is 0
    pub fn yield_percentage(&self) -> f64 {
        self.fraction_of_total(self.good_dies) * 100.0
    }

    /// Defective dies as a percentage of total; 0 when total is 0
    pub fn defect_rate(&self) -> f64 {
        self.fraction_of_total(self.defective_dies) * 100.0
    }

    /// Defects per million
    pub fn dpm(&self) -> f64 {
        self.fraction_of_total(self.defective_dies) * 1_000_000.0
    }

    pub fn is_valid(&self) -> bool {
        self.total_dies > 0 && self.good_dies.saturating_add(self.defective_dies) <= self.total_dies
    }

    fn fraction_of_total(&self, count: u64) -> f64 {
        if self.total_dies == 0 {
            return 0.0;
        }
        count as f64 / self.total_dies as f64
    }
}

fn check_names(wafer_name: &str, lot_number: &str) -> Result<(), ValidationError> {
    if wafer_name.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: "wafer name",
        });
    }
    if lot_number.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: "lot number",
        });
    }
    Ok(())
}

fn check_total(total: u64) -> Result<(), ValidationError> {
    if total == 0 {
        return Err(ValidationError::NonPositive {
            field: "total dies",
        });
    }
    Ok(())
}

fn derive_other(total: u64, known: u64, field: &'static str) -> Result<u64, ValidationError> {
    total
        .checked_sub(known)
        .ok_or(ValidationError::Negative { field })
}

impl Entity for WaferDieCalculation {
    const PREFIX: EntityPrefix = EntityPrefix::Wdc;
    const COLLECTION_KEY: &'static str = "waferDieCalculations";
    const KIND: &'static str = "wafer/die calculation";

    fn id(&self) -> &EntityId {
        &self.id
    }
}
