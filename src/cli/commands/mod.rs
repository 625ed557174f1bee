//! CLI command implementations

pub mod bin;
pub mod completions;
pub mod freq;
pub mod reference;
pub mod spec;
pub mod stats;
pub mod testtime;
pub mod wafer;
pub mod yld;
