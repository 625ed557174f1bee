//! Period/frequency converter

use crate::core::collection::Collection;
use crate::core::error::{Result, ValidationError};
use crate::core::identity::EntityId;
use crate::core::store::SharedStore;
use crate::entities::period_frequency::{FrequencyUnit, PeriodFrequencyCalculation, TimeUnit};

fn require_positive(value: f64, field: &'static str) -> std::result::Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive { field });
    }
    Ok(value)
}

/// Frequency, in `frequency_unit`, of a period given in `time_unit`
pub fn period_to_frequency(
    value: f64,
    time_unit: TimeUnit,
    frequency_unit: FrequencyUnit,
) -> std::result::Result<f64, ValidationError> {
    let period_seconds = require_positive(value, "period")? * time_unit.to_seconds();
    let frequency_hz = 1.0 / period_seconds;
    Ok(frequency_hz / frequency_unit.divisor())
}

/// Period, in `time_unit`, of a frequency given in `frequency_unit`
pub fn frequency_to_period(
    value: f64,
    frequency_unit: FrequencyUnit,
    time_unit: TimeUnit,
) -> std::result::Result<f64, ValidationError> {
    let frequency_hz = require_positive(value, "frequency")? * frequency_unit.divisor();
    let period_seconds = 1.0 / frequency_hz;
    Ok(period_seconds / time_unit.to_seconds())
}

/// Owner of saved conversions
pub struct PeriodFrequencyEngine {
    calculations: Collection<PeriodFrequencyCalculation>,
}

impl PeriodFrequencyEngine {
    pub fn open(store: SharedStore) -> Self {
        Self {
            calculations: Collection::load(store),
        }
    }

    pub fn calculations(&self) -> &[PeriodFrequencyCalculation] {
        self.calculations.items()
    }

    pub fn calculation(&self, id: &EntityId) -> Option<&PeriodFrequencyCalculation> {
        self.calculations.get(id)
    }

    pub fn add_calculation(&mut self, calculation: PeriodFrequencyCalculation) -> Result<EntityId> {
        let id = calculation.id;
        self.calculations.add(calculation)?;
        Ok(id)
    }

    /// Replace a saved conversion, recomputing its stored frequency
    pub fn update_calculation(&mut self, mut calculation: PeriodFrequencyCalculation) -> Result<()> {
        calculation.frequency_value = period_to_frequency(
            calculation.input_value,
            calculation.input_unit,
            calculation.frequency_unit,
        )?;
        self.calculations.update(calculation)
    }

    pub fn delete_calculation(&mut self, index: usize) -> Result<PeriodFrequencyCalculation> {
        self.calculations.delete_at(index)
    }
}
