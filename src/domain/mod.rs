//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - per-metric time series (`DateSeries`, `RegionSeries`)
//! - the Lower-Saxony composite row (`Indicators`)
//! - run settings (`OverviewConfig`)

pub mod types;

pub use types::*;
