//! Statistics engine: descriptive statistics and process capability
//!
//! All functions are pure and operate on a slice of values. Degenerate
//! inputs (empty set, a single value, zero spread) return 0 rather than
//! NaN or infinity. Cpk/Ppk additionally reject `LSL >= USL`.
//!
//! # Formulas
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | sample variance | Σ(x - x̄)² / (n - 1) |
//! | population variance | Σ(x - x̄)² / n |
//! | Cpk | min(USL - x̄, x̄ - LSL) / (3 · s) with sample std dev |
//! | Ppk | min(USL - x̄, x̄ - LSL) / (3 · σ) with population std dev |

use serde::Serialize;

use crate::core::collection::Collection;
use crate::core::error::{Result, ValidationError};
use crate::core::identity::EntityId;
use crate::core::numeric::require_finite;
use crate::core::store::SharedStore;
use crate::entities::dataset::DataSet;

/// Index value at or above which a process is considered capable
pub const CAPABLE_THRESHOLD: f64 = 1.33;

/// Index value at or above which a process is marginally capable
pub const MARGINAL_THRESHOLD: f64 = 1.0;

pub fn count(values: &[f64]) -> usize {
    values.len()
}

/// Arithmetic mean; 0 for an empty set
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Midpoint of the sorted values, averaging the two central values for an
/// even count; 0 for an empty set
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

fn sum_squared_deviations(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum()
}

/// Sample variance (n - 1 denominator); 0 when n <= 1
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    sum_squared_deviations(values) / (values.len() - 1) as f64
}

/// Sample standard deviation; 0 when n <= 1
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Population variance (n denominator); 0 for an empty set
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum_squared_deviations(values) / values.len() as f64
}

/// Population standard deviation; 0 for an empty set
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Smallest value; 0 for an empty set
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Largest value; 0 for an empty set
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// `max - min`; 0 for an empty set
pub fn range(values: &[f64]) -> f64 {
    max(values) - min(values)
}

fn check_spec_limits(lsl: f64, usl: f64) -> std::result::Result<(), ValidationError> {
    require_finite(lsl, "LSL")?;
    require_finite(usl, "USL")?;
    if lsl >= usl {
        return Err(ValidationError::InvalidRange {
            lower: lsl,
            upper: usl,
        });
    }
    Ok(())
}

fn capability(m: f64, sigma: f64, lsl: f64, usl: f64) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    let upper = (usl - m) / (3.0 * sigma);
    let lower = (m - lsl) / (3.0 * sigma);
    upper.min(lower)
}

/// Process capability using the sample standard deviation.
///
/// 0 when n <= 1 or the values have no spread.
pub fn cpk(values: &[f64], lsl: f64, usl: f64) -> std::result::Result<f64, ValidationError> {
    check_spec_limits(lsl, usl)?;
    if values.len() <= 1 {
        return Ok(0.0);
    }
    Ok(capability(mean(values), sample_std_dev(values), lsl, usl))
}

/// Process performance using the population standard deviation.
///
/// 0 for an empty set or when the values have no spread.
pub fn ppk(values: &[f64], lsl: f64, usl: f64) -> std::result::Result<f64, ValidationError> {
    check_spec_limits(lsl, usl)?;
    if values.is_empty() {
        return Ok(0.0);
    }
    Ok(capability(mean(values), population_std_dev(values), lsl, usl))
}

/// Traffic-light reading of a Cpk/Ppk value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityRating {
    /// >= 1.33
    Capable,
    /// >= 1.0
    Marginal,
    NotCapable,
}

impl CapabilityRating {
    pub fn from_index(index: f64) -> Self {
        if index >= CAPABLE_THRESHOLD {
            CapabilityRating::Capable
        } else if index >= MARGINAL_THRESHOLD {
            CapabilityRating::Marginal
        } else {
            CapabilityRating::NotCapable
        }
    }
}

impl std::fmt::Display for CapabilityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityRating::Capable => write!(f, "capable"),
            CapabilityRating::Marginal => write!(f, "marginal"),
            CapabilityRating::NotCapable => write!(f, "not capable"),
        }
    }
}

/// Descriptive statistics for one data set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Self {
        Self {
            count: count(values),
            mean: mean(values),
            median: median(values),
            std_dev: sample_std_dev(values),
            variance: sample_variance(values),
            min: min(values),
            max: max(values),
            range: range(values),
        }
    }
}

/// Cpk and Ppk for one data set against one pair of limits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityReport {
    pub lsl: f64,
    pub usl: f64,
    pub cpk: f64,
    pub ppk: f64,
    pub cpk_rating: CapabilityRating,
    pub ppk_rating: CapabilityRating,
}

impl CapabilityReport {
    pub fn compute(values: &[f64], lsl: f64, usl: f64) -> std::result::Result<Self, ValidationError> {
        let cpk = cpk(values, lsl, usl)?;
        let ppk = ppk(values, lsl, usl)?;
        Ok(Self {
            lsl,
            usl,
            cpk,
            ppk,
            cpk_rating: CapabilityRating::from_index(cpk),
            ppk_rating: CapabilityRating::from_index(ppk),
        })
    }
}

/// Owner of the stored data sets
pub struct StatisticsEngine {
    data_sets: Collection<DataSet>,
}

impl StatisticsEngine {
    pub fn open(store: SharedStore) -> Self {
        Self {
            data_sets: Collection::load(store),
        }
    }

    pub fn data_sets(&self) -> &[DataSet] {
        self.data_sets.items()
    }

    pub fn data_set(&self, id: &EntityId) -> Option<&DataSet> {
        self.data_sets.get(id)
    }

    pub fn add_data_set(&mut self, data_set: DataSet) -> Result<EntityId> {
        data_set.validate()?;
        let id = data_set.id;
        self.data_sets.add(data_set)?;
        Ok(id)
    }

    pub fn update_data_set(&mut self, data_set: DataSet) -> Result<()> {
        data_set.validate()?;
        self.data_sets.update(data_set)
    }

    pub fn delete_data_set(&mut self, index: usize) -> Result<DataSet> {
        self.data_sets.delete_at(index)
    }
}
