//! Structured results of a full analysis run.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::schedule::TimeAnomalies;
use crate::analyzers::topology::Topology;
use crate::error::TopologyError;
use crate::record::LineId;
use crate::stats::ErrorTally;

/// Outcome of the start/finish check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopologyOutcome {
    Ok(Topology),
    BadLine(TopologyError),
}

impl TopologyOutcome {
    pub fn topology(&self) -> Option<&Topology> {
        match self {
            TopologyOutcome::Ok(topology) => Some(topology),
            TopologyOutcome::BadLine(_) => None,
        }
    }
}

impl From<Result<Topology, TopologyError>> for TopologyOutcome {
    fn from(result: Result<Topology, TopologyError>) -> Self {
        match result {
            Ok(topology) => TopologyOutcome::Ok(topology),
            Err(err) => TopologyOutcome::BadLine(err),
        }
    }
}

/// Every analysis of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub records: usize,
    pub errors: ErrorTally,
    pub line_stops: BTreeMap<LineId, usize>,
    pub topology: TopologyOutcome,
    /// Present only when the topology check passed.
    pub transfers: Option<Vec<String>>,
    pub time_anomalies: TimeAnomalies,
}
