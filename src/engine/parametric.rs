//! Parametric spec engine: limit checks, margins and measurement history

use crate::core::collection::Collection;
use crate::core::error::{Result, ToolkitError};
use crate::core::identity::EntityId;
use crate::core::store::SharedStore;
use crate::entities::parametric::{MeasuredValue, ParametricSpec, TestStatus};

/// `Pass` if `min <= value <= max`, else `Fail`
pub fn test_status(spec: &ParametricSpec, value: f64) -> TestStatus {
    spec.status_for(value)
}

/// Signed margin percentage, see [`ParametricSpec::margin`]
pub fn margin(spec: &ParametricSpec, value: f64) -> f64 {
    spec.margin(value)
}

/// Owner of specs and their append-only measurements
pub struct ParametricEngine {
    specs: Collection<ParametricSpec>,
    measurements: Collection<MeasuredValue>,
}

impl ParametricEngine {
    pub fn open(store: SharedStore) -> Self {
        Self {
            specs: Collection::load(store.clone()),
            measurements: Collection::load(store),
        }
    }

    pub fn specs(&self) -> &[ParametricSpec] {
        self.specs.items()
    }

    pub fn spec(&self, id: &EntityId) -> Option<&ParametricSpec> {
        self.specs.get(id)
    }

    pub fn add_spec(&mut self, spec: ParametricSpec) -> Result<EntityId> {
        spec.validate()?;
        let id = spec.id;
        self.specs.add(spec)?;
        Ok(id)
    }

    pub fn update_spec(&mut self, spec: ParametricSpec) -> Result<()> {
        spec.validate()?;
        self.specs.update(spec)
    }

    /// Remove a spec by position. Its measurements stay on record.
    pub fn delete_spec(&mut self, index: usize) -> Result<ParametricSpec> {
        self.specs.delete_at(index)
    }

    /// Record a measurement against an existing spec
    pub fn add_measurement(&mut self, spec_id: &EntityId, value: f64) -> Result<EntityId> {
        if self.specs.get(spec_id).is_none() {
            return Err(ToolkitError::NotFound {
                kind: "spec",
                id: spec_id.to_string(),
            });
        }
        self.record_measurement(MeasuredValue::new(*spec_id, value)?)
    }

    /// Append a pre-built measurement (imports keep their own timestamp)
    pub fn record_measurement(&mut self, measurement: MeasuredValue) -> Result<EntityId> {
        let id = measurement.id;
        self.measurements.add(measurement)?;
        Ok(id)
    }

    /// Measurements for a spec, newest first
    pub fn measurements_for(&self, spec_id: &EntityId) -> Vec<&MeasuredValue> {
        let mut found: Vec<&MeasuredValue> = self
            .measurements
            .items()
            .iter()
            .filter(|m| &m.spec_id == spec_id)
            .collect();
        found.sort_by(|a, b| b.measured_at.cmp(&a.measured_at));
        found
    }

    pub fn latest_measurement(&self, spec_id: &EntityId) -> Option<&MeasuredValue> {
        self.measurements_for(spec_id).into_iter().next()
    }

    /// Status of the spec's latest measurement, `NoData` if it has none
    pub fn latest_status(&self, spec: &ParametricSpec) -> TestStatus {
        match self.latest_measurement(&spec.id) {
            Some(m) => spec.status_for(m.value),
            None => TestStatus::NoData,
        }
    }

    /// Whether `value` is within the limits of spec `spec_id`; false for an
    /// unknown spec
    pub fn is_value_in_spec(&self, spec_id: &EntityId, value: f64) -> bool {
        self.specs
            .get(spec_id)
            .map(|spec| spec.contains(value))
            .unwrap_or(false)
    }
}
