//! Error types shared by every engine

use miette::Diagnostic;
use thiserror::Error;

use crate::core::identity::IdParseError;

/// Malformed or out-of-range user input.
///
/// Returned before any collection is touched, so a failed call never
/// leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    #[diagnostic(code(semitools::validation::empty))]
    Empty { field: &'static str },

    #[error("'{input}' is not a number")]
    #[diagnostic(
        code(semitools::validation::not_a_number),
        help("use a plain decimal such as 1.25 or 3e-9")
    )]
    NotANumber { input: String },

    #[error("{field} must be a finite number")]
    #[diagnostic(code(semitools::validation::non_finite))]
    NonFinite { field: &'static str },

    #[error("{field} must not be negative")]
    #[diagnostic(code(semitools::validation::negative))]
    Negative { field: &'static str },

    #[error("{field} must be greater than zero")]
    #[diagnostic(code(semitools::validation::non_positive))]
    NonPositive { field: &'static str },

    #[error("lower limit {lower} must be less than upper limit {upper}")]
    #[diagnostic(code(semitools::validation::invalid_range))]
    InvalidRange { lower: f64, upper: f64 },

    #[error("'{input}' is not a #RRGGBB color")]
    #[diagnostic(code(semitools::validation::invalid_color))]
    InvalidColor { input: String },

    #[error("good ({good}) + defective ({defective}) dies exceed total ({total})")]
    #[diagnostic(code(semitools::validation::exceeds_total))]
    ExceedsTotal { good: u64, defective: u64, total: u64 },

    #[error("bin {bin_id} is counted more than once")]
    #[diagnostic(
        code(semitools::validation::duplicate_bin),
        help("give each bin a single count per wafer")
    )]
    DuplicateBin { bin_id: String },

    #[error("at least one value is required")]
    #[diagnostic(code(semitools::validation::no_values))]
    NoValues,

    #[error("at least one test step is required")]
    #[diagnostic(code(semitools::validation::no_steps))]
    NoSteps,
}

/// Failures talking to the blob store
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    #[diagnostic(code(semitools::store::io))]
    Io(#[from] std::io::Error),

    #[error("failed to encode collection: {0}")]
    #[diagnostic(code(semitools::store::encode))]
    Encode(#[source] serde_json::Error),

    #[error("stored blob '{key}' could not be decoded: {source}")]
    #[diagnostic(code(semitools::store::decode))]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for engine operations
#[derive(Debug, Error, Diagnostic)]
pub enum ToolkitError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("{kind} '{id}' not found")]
    #[diagnostic(
        code(semitools::not_found),
        help("run the matching `list` command to see valid ids")
    )]
    NotFound { kind: &'static str, id: String },

    #[error("index {index} is out of bounds for a collection of {len}")]
    #[diagnostic(code(semitools::index_out_of_bounds))]
    IndexOutOfBounds { index: usize, len: usize },

    #[error(transparent)]
    #[diagnostic(code(semitools::invalid_id))]
    InvalidId(#[from] IdParseError),
}

pub type Result<T, E = ToolkitError> = std::result::Result<T, E>;
