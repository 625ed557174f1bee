//! semitools: calculation core of a semiconductor test-engineering toolkit
//!
//! Bin/yield accounting, parametric limit checks, process capability
//! statistics, test-time estimation, period/frequency conversion and
//! reference tables. Records persist through a pluggable blob store.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
