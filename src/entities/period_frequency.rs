//! Time and frequency units, and saved period/frequency calculations

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};

/// Time scale for periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeUnit {
    #[default]
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "μs", alias = "us")]
    Microseconds,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    Seconds,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
    ];

    /// Seconds per one unit
    pub fn to_seconds(&self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1e-9,
            TimeUnit::Microseconds => 1e-6,
            TimeUnit::Milliseconds => 1e-3,
            TimeUnit::Seconds => 1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "μs",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "Nanoseconds (ns)",
            TimeUnit::Microseconds => "Microseconds (μs)",
            TimeUnit::Milliseconds => "Milliseconds (ms)",
            TimeUnit::Seconds => "Seconds (s)",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ns" => Ok(TimeUnit::Nanoseconds),
            "us" | "μs" | "µs" => Ok(TimeUnit::Microseconds),
            "ms" => Ok(TimeUnit::Milliseconds),
            "s" => Ok(TimeUnit::Seconds),
            _ => Err(format!("unknown time unit '{}' (expected ns, us, ms or s)", s)),
        }
    }
}

/// Frequency scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FrequencyUnit {
    #[serde(rename = "Hz")]
    Hz,
    #[serde(rename = "kHz")]
    KHz,
    #[default]
    #[serde(rename = "MHz")]
    MHz,
    #[serde(rename = "GHz")]
    GHz,
}

impl FrequencyUnit {
    pub const ALL: [FrequencyUnit; 4] = [
        FrequencyUnit::Hz,
        FrequencyUnit::KHz,
        FrequencyUnit::MHz,
        FrequencyUnit::GHz,
    ];

    /// Hz per one unit
    pub fn divisor(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for FrequencyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hz" => Ok(FrequencyUnit::Hz),
            "khz" => Ok(FrequencyUnit::KHz),
            "mhz" => Ok(FrequencyUnit::MHz),
            "ghz" => Ok(FrequencyUnit::GHz),
            _ => Err(format!(
                "unknown frequency unit '{}' (expected Hz, kHz, MHz or GHz)",
                s
            )),
        }
    }
}

/// A saved period-to-frequency conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodFrequencyCalculation {
    pub id: EntityId,

    /// Period, in `input_unit`
    pub input_value: f64,

    pub input_unit: TimeUnit,

    /// Frequency, in `frequency_unit`, as computed when saved
    #[serde(default)]
    pub frequency_value: f64,

    #[serde(default)]
    pub frequency_unit: FrequencyUnit,

    pub created_at: DateTime<Utc>,
}

impl PeriodFrequencyCalculation {
    /// Record a conversion; the period must be positive
    pub fn new(
        input_value: f64,
        input_unit: TimeUnit,
        frequency_unit: FrequencyUnit,
    ) -> Result<Self, ValidationError> {
        if !input_value.is_finite() {
            return Err(ValidationError::NonFinite { field: "period" });
        }
        if input_value <= 0.0 {
            return Err(ValidationError::NonPositive { field: "period" });
        }
        let mut calc = Self {
            id: EntityId::new(EntityPrefix::Pfc),
            input_value,
            input_unit,
            frequency_value: 0.0,
            frequency_unit,
            created_at: Utc::now(),
        };
        calc.frequency_value = calc.display_frequency();
        Ok(calc)
    }

    pub fn period_in_seconds(&self) -> f64 {
        self.input_value * self.input_unit.to_seconds()
    }

    /// 0 when the stored period is not positive
    pub fn frequency_in_hz(&self) -> f64 {
        let period = self.period_in_seconds();
        if period > 0.0 {
            1.0 / period
        } else {
            0.0
        }
    }

    pub fn display_frequency(&self) -> f64 {
        self.frequency_in_hz() / self.frequency_unit.divisor()
    }

    pub fn is_valid(&self) -> bool {
        self.input_value > 0.0
    }
}

impl Entity for PeriodFrequencyCalculation {
    const PREFIX: EntityPrefix = EntityPrefix::Pfc;
    const COLLECTION_KEY: &'static str = "periodFrequencyCalculations";
    const KIND: &'static str = "period/frequency calculation";

    fn id(&self) -> &EntityId {
        &self.id
    }
}
