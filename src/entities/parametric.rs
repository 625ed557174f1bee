//! Parametric test specifications and measurements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::numeric::require_finite;

/// Outcome of checking a value against a spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Pass,
    Fail,
    /// Part of the status vocabulary, but no rule currently produces it
    Marginal,
    NoData,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "pass"),
            TestStatus::Fail => write!(f, "fail"),
            TestStatus::Marginal => write!(f, "marginal"),
            TestStatus::NoData => write!(f, "no data"),
        }
    }
}

/// A named min/max limit pair for one parametric test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParametricSpec {
    /// Unique identifier
    pub id: EntityId,

    /// Spec name (e.g. "VDD Leakage")
    pub name: String,

    /// Test program test name
    pub test_name: String,

    pub min_limit: f64,

    pub max_limit: f64,

    /// Unit label, display only
    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl ParametricSpec {
    /// Create a spec; limits must be finite with `min_limit < max_limit`
    pub fn new(
        name: impl Into<String>,
        test_name: impl Into<String>,
        min_limit: f64,
        max_limit: f64,
        unit: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let spec = Self {
            id: EntityId::new(EntityPrefix::Spec),
            name: name.into().trim().to_string(),
            test_name: test_name.into().trim().to_string(),
            min_limit,
            max_limit,
            unit: unit.into().trim().to_string(),
            description: String::new(),
            created_at: Utc::now(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Name must not be blank; limits must be finite with min < max
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "spec name" });
        }
        validate_limits(self.min_limit, self.max_limit)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// `min_limit <= value <= max_limit`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_limit && value <= self.max_limit
    }

    /// Check a specific value against the limits.
    ///
    /// Only ever yields `Pass` or `Fail`.
    pub fn status_for(&self, value: f64) -> TestStatus {
        if self.contains(value) {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        }
    }

    /// Signed distance from the limits as a percentage of the half-range.
    ///
    /// 100 at the midpoint, 0 on a limit, negative outside. A degenerate
    /// spec (zero range) reports 0.
    pub fn margin(&self, value: f64) -> f64 {
        let midpoint = (self.min_limit + self.max_limit) / 2.0;
        let half_range = (self.max_limit - self.min_limit) / 2.0;
        if half_range <= 0.0 {
            return 0.0;
        }
        let deviation = (value - midpoint).abs();
        ((half_range - deviation) / half_range) * 100.0
    }
}

/// Shared min/max check for creation and edits
pub fn validate_limits(min_limit: f64, max_limit: f64) -> Result<(), ValidationError> {
    require_finite(min_limit, "minimum limit")?;
    require_finite(max_limit, "maximum limit")?;
    if min_limit >= max_limit {
        return Err(ValidationError::InvalidRange {
            lower: min_limit,
            upper: max_limit,
        });
    }
    Ok(())
}

impl Entity for ParametricSpec {
    const PREFIX: EntityPrefix = EntityPrefix::Spec;
    const COLLECTION_KEY: &'static str = "parametricSpecs";
    const KIND: &'static str = "spec";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// One measurement taken against a spec. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredValue {
    pub id: EntityId,

    /// Weak reference to the spec; may dangle
    pub spec_id: EntityId,

    pub value: f64,

    pub measured_at: DateTime<Utc>,
}

impl MeasuredValue {
    pub fn new(spec_id: EntityId, value: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            id: EntityId::new(EntityPrefix::Meas),
            spec_id,
            value: require_finite(value, "measured value")?,
            measured_at: Utc::now(),
        })
    }

    /// Override the timestamp (imports, tests)
    pub fn at(mut self, measured_at: DateTime<Utc>) -> Self {
        self.measured_at = measured_at;
        self
    }
}

impl Entity for MeasuredValue {
    const PREFIX: EntityPrefix = EntityPrefix::Meas;
    const COLLECTION_KEY: &'static str = "parametricMeasurements";
    const KIND: &'static str = "measurement";

    fn id(&self) -> &EntityId {
        &self.id
    }
}
