use std::collections::BTreeMap;

use crate::record::{LineId, StopRecord};

/// Number of records per line. Records without a valid `bus_id` are skipped.
pub fn count_line_stops(records: &[StopRecord]) -> BTreeMap<LineId, usize> {
    records
        .iter()
        .filter_map(StopRecord::line_id)
        .fold(BTreeMap::new(), |mut counts, line| {
            *counts.entry(line).or_default() += 1;
            counts
        })
}
