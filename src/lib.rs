//! `corona-overview` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the reconciliation logic is testable without network access or processes
//! - each feed parser can be exercised on canned bytes

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod reconcile;
pub mod report;
