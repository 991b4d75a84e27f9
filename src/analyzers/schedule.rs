//! Arrival time ordering within each line.

use std::collections::BTreeMap;
use tracing::debug;

use crate::record::{LineKey, StopRecord};

/// First out-of-order stop per line, by name, or as `record <index>` when the
/// record has no stop name. Lines absent from the map are consistent.
pub type TimeAnomalies = BTreeMap<LineKey, String>;

#[derive(Debug, Default)]
struct TimeScan {
    last_time: BTreeMap<LineKey, String>,
    anomalies: TimeAnomalies,
}

impl TimeScan {
    fn with_record(mut self, (index, record): (usize, &StopRecord)) -> Self {
        let (Some(bus_id), Some(a_time)) = (&record.bus_id, &record.a_time) else {
            return self;
        };
        let line = LineKey::from(bus_id);
        if self.anomalies.contains_key(&line) {
            return self;
        }

        let time = a_time.as_text();
        match self.last_time.get_mut(&line) {
            None => {
                self.last_time.insert(line, time.into_owned());
            }
            // equal times are accepted
            Some(last) if last.as_str() <= time.as_ref() => {
                *last = time.into_owned();
            }
            Some(last) => {
                debug!(%line, last = %last, time = %time, "Arrival time went backwards");
                self.anomalies.insert(line, station_label(index, record));
            }
        }
        self
    }
}

fn station_label(index: usize, record: &StopRecord) -> String {
    match record.stop_name_text() {
        name if name.is_empty() => format!("record {index}"),
        name => name,
    }
}

/// Scans records in input order and reports, per line, the first stop whose
/// arrival time is earlier than the previous stop of that line.
///
/// Fields are not validated first: times compare as strings, which orders
/// zero-padded `HH:MM` values correctly. Records without a `bus_id` or
/// `a_time` are skipped.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn check_arrival_times(records: &[StopRecord]) -> TimeAnomalies {
    records
        .iter()
        .enumerate()
        .fold(TimeScan::default(), TimeScan::with_record)
        .anomalies
}
