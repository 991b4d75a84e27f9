//! Start and finish stops per line.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::error::{TopologyError, TopologyReason};
use crate::record::{Field, LineId, StopRecord};
use crate::validate::{StopTypeContext, is_stop_type};

/// Result of a successful topology check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topology {
    /// Sorted, deduplicated start stop names.
    pub starts: Vec<String>,
    /// Sorted, deduplicated finish stop names.
    pub finishes: Vec<String>,
    /// Every stop name of each line in input order, duplicates kept.
    #[serde(skip)]
    pub line_stops: BTreeMap<LineId, Vec<String>>,
}

#[derive(Debug, Default)]
struct Terminals {
    starts: BTreeMap<LineId, String>,
    finishes: BTreeMap<LineId, String>,
    line_stops: BTreeMap<LineId, Vec<String>>,
}

impl Terminals {
    fn with_record(mut self, record: &StopRecord) -> Result<Self, TopologyError> {
        let Some(line) = record.line_id() else {
            return Ok(self);
        };
        let name = record.stop_name_text();

        let role = record
            .get(Field::StopType)
            .filter(|value| is_stop_type(value, StopTypeContext::Required))
            .and_then(|value| value.as_str());

        match role {
            Some("S") => {
                if self.starts.insert(line, name.clone()).is_some() {
                    return Err(TopologyError {
                        line,
                        reason: TopologyReason::DuplicateStart,
                    });
                }
            }
            Some("F") => {
                if self.finishes.insert(line, name.clone()).is_some() {
                    return Err(TopologyError {
                        line,
                        reason: TopologyReason::DuplicateFinish,
                    });
                }
            }
            _ => {}
        }

        self.line_stops.entry(line).or_default().push(name);
        Ok(self)
    }

    /// First line found with a start but no finish, then the reverse.
    fn unpaired_line(&self) -> Option<LineId> {
        let missing_finish = self
            .starts
            .keys()
            .find(|line| !self.finishes.contains_key(*line));
        let missing_start = || {
            self.finishes
                .keys()
                .find(|line| !self.starts.contains_key(*line))
        };
        missing_finish.or_else(missing_start).copied()
    }
}

/// Checks that every line has exactly one start and one finish stop.
///
/// Only records with a valid `bus_id` and a filled-in `stop_type` take part
/// in the role check; every record with a valid `bus_id` contributes its
/// stop name to the per-line lists.
///
/// # Errors
///
/// Returns [`TopologyError`] naming the first offending line.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn analyze_topology(records: &[StopRecord]) -> Result<Topology, TopologyError> {
    let terminals = records
        .iter()
        .try_fold(Terminals::default(), Terminals::with_record)
        .inspect_err(|err| warn!(line = err.line, reason = %err.reason, "Bad line"))?;

    if let Some(line) = terminals.unpaired_line() {
        let err = TopologyError {
            line,
            reason: TopologyReason::MissingStartOrFinish,
        };
        warn!(line, reason = %err.reason, "Bad line");
        return Err(err);
    }

    let sorted = |names: BTreeMap<LineId, String>| -> Vec<String> {
        names
            .into_values()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };

    let topology = Topology {
        starts: sorted(terminals.starts),
        finishes: sorted(terminals.finishes),
        line_stops: terminals.line_stops,
    };
    debug!(
        lines = topology.line_stops.len(),
        starts = topology.starts.len(),
        finishes = topology.finishes.len(),
        "Topology checked"
    );
    Ok(topology)
}
