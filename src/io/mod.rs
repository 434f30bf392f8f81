//! Source parsing.
//!
//! - number/date conventions (`numbers`)
//! - region label matching (`regions`)
//! - generic delimited-text ingest (`delimited`) and the concrete feeds (`feeds`)
//! - the case-incidence workbook (`workbook`)

pub mod delimited;
pub mod feeds;
pub mod numbers;
pub mod regions;
pub mod workbook;
