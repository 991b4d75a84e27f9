//! Schedule analyses.
//!
//! Each stage is a standalone function over the decoded records:
//! per-line stop counts, start/finish topology, transfer stops and
//! arrival time ordering. [`analyzer::analyze`] runs them all.

pub mod analyzer;
pub mod lines;
pub mod schedule;
pub mod topology;
pub mod transfers;
pub mod types;
