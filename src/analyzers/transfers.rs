use std::collections::{BTreeMap, BTreeSet};

use crate::record::LineId;

/// Stop names served by two or more distinct lines, sorted.
///
/// Builds a stop → lines index, so repeated stops within one line count once.
pub fn find_transfer_stops(line_stops: &BTreeMap<LineId, Vec<String>>) -> Vec<String> {
    let mut served_by: BTreeMap<&str, BTreeSet<LineId>> = BTreeMap::new();
    for (line, stops) in line_stops {
        for stop in stops {
            served_by.entry(stop.as_str()).or_default().insert(*line);
        }
    }

    served_by
        .into_iter()
        .filter(|(_, lines)| lines.len() >= 2)
        .map(|(stop, _)| stop.to_string())
        .collect()
}
