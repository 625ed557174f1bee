//! Calculation engines
//!
//! Each engine owns the collections it reads and writes and persists them
//! through the injected [`SharedStore`](crate::core::store::SharedStore).
//! The pure formulas are free functions so they can be used without a store.

pub mod parametric;
pub mod period_frequency;
pub mod reference;
pub mod statistics;
pub mod test_time;
pub mod wafer_die;
pub mod yield_bins;

pub use parametric::ParametricEngine;
pub use period_frequency::{frequency_to_period, period_to_frequency, PeriodFrequencyEngine};
pub use statistics::{CapabilityRating, CapabilityReport, StatisticsEngine, Summary};
pub use test_time::{TestTimeEngine, TestTimeEstimate};
pub use wafer_die::WaferDieEngine;
pub use yield_bins::{BinShare, YieldEngine};
