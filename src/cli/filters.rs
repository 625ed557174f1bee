//! Filter enums for list commands

use clap::ValueEnum;

use crate::engine::statistics::CapabilityRating;
use crate::entities::parametric::TestStatus;

/// Filter specs by the status of their latest measurement
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Latest measurement inside the limits
    Pass,
    /// Latest measurement outside the limits
    Fail,
    /// No measurement yet
    NoData,
    /// Pass or fail, i.e. measured at least once
    Measured,
    /// Everything - default
    #[default]
    All,
}

impl StatusFilter {
    pub fn matches(&self, status: TestStatus) -> bool {
        match self {
            StatusFilter::Pass => status == TestStatus::Pass,
            StatusFilter::Fail => status == TestStatus::Fail,
            StatusFilter::NoData => status == TestStatus::NoData,
            StatusFilter::Measured => status != TestStatus::NoData,
            StatusFilter::All => true,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::Pass => write!(f, "pass"),
            StatusFilter::Fail => write!(f, "fail"),
            StatusFilter::NoData => write!(f, "no-data"),
            StatusFilter::Measured => write!(f, "measured"),
            StatusFilter::All => write!(f, "all"),
        }
    }
}

/// Terminal color for a test status
pub fn styled_status(status: TestStatus) -> String {
    let text = status.to_string();
    match status {
        TestStatus::Pass => console::style(text).green().to_string(),
        TestStatus::Fail => console::style(text).red().to_string(),
        TestStatus::Marginal => console::style(text).yellow().to_string(),
        TestStatus::NoData => console::style(text).dim().to_string(),
    }
}

/// Terminal color for a capability rating
pub fn styled_rating(rating: CapabilityRating) -> String {
    let text = rating.to_string();
    match rating {
        CapabilityRating::Capable => console::style(text).green().to_string(),
        CapabilityRating::Marginal => console::style(text).yellow().to_string(),
        CapabilityRating::NotCapable => console::style(text).red().to_string(),
    }
}
