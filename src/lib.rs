//! Validation and summary of bus line schedules.
//!
//! A batch of stop records goes through independent analyses: field
//! validation, per-line stop counts, start/finish topology, transfer stops
//! and arrival time ordering. See [`analyzers::analyzer::analyze`].

pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
pub mod stats;
pub mod validate;
