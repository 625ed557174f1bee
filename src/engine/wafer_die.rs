//! Wafer/die engine: stored good/defective calculations

use crate::core::collection::Collection;
use crate::core::error::Result;
use crate::core::identity::EntityId;
use crate::core::store::SharedStore;
use crate::entities::wafer_die::WaferDieCalculation;

pub struct WaferDieEngine {
    calculations: Collection<WaferDieCalculation>,
}

impl WaferDieEngine {
    pub fn open(store: SharedStore) -> Self {
        Self {
            calculations: Collection::load(store),
        }
    }

    pub fn calculations(&self) -> &[WaferDieCalculation] {
        self.calculations.items()
    }

    pub fn calculation(&self, id: &EntityId) -> Option<&WaferDieCalculation> {
        self.calculations.get(id)
    }

    pub fn add_calculation(&mut self, calculation: WaferDieCalculation) -> Result<EntityId> {
        calculation.validate()?;
        let id = calculation.id;
        self.calculations.add(calculation)?;
        Ok(id)
    }

    pub fn update_calculation(&mut self, calculation: WaferDieCalculation) -> Result<()> {
        calculation.validate()?;
        self.calculations.update(calculation)
    }

    pub fn delete_calculation(&mut self, index: usize) -> Result<WaferDieCalculation> {
        self.calculations.delete_at(index)
    }

    /// Mean yield percentage across stored calculations; 0 when empty
    pub fn average_yield(&self) -> f64 {
        let calcs = self.calculations();
        if calcs.is_empty() {
            return 0.0;
        }
        calcs.iter().map(|c| c.yield_percentage()).sum::<f64>() / calcs.len() as f64
    }
}
