//! Record type definitions

pub mod bin;
pub mod dataset;
pub mod parametric;
pub mod period_frequency;
pub mod reference;
pub mod test_profile;
pub mod wafer_die;
pub mod yield_record;

pub use bin::{default_bins, BinDefinition, HexColor};
pub use dataset::DataSet;
pub use parametric::{MeasuredValue, ParametricSpec, TestStatus};
pub use period_frequency::{FrequencyUnit, PeriodFrequencyCalculation, TimeUnit};
pub use reference::{ReferenceItem, ReferenceTable, REFERENCE_TABLES};
pub use test_profile::{TestProfile, TestStep};
pub use wafer_die::WaferDieCalculation;
pub use yield_record::{BinCount, YieldRecord};
