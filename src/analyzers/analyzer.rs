use tracing::info;

use crate::analyzers::lines::count_line_stops;
use crate::analyzers::schedule::check_arrival_times;
use crate::analyzers::topology::analyze_topology;
use crate::analyzers::transfers::find_transfer_stops;
use crate::analyzers::types::{ScheduleReport, TopologyOutcome};
use crate::record::StopRecord;
use crate::stats::ErrorTally;

/// Runs every analysis over one batch of records.
///
/// The stages are independent except that transfers are only computed
/// when the topology check passes. A bad line never stops the other stages.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn analyze(records: &[StopRecord]) -> ScheduleReport {
    let errors = ErrorTally::from_records(records);
    let line_stops = count_line_stops(records);
    let topology = TopologyOutcome::from(analyze_topology(records));
    let transfers = topology
        .topology()
        .map(|topology| find_transfer_stops(&topology.line_stops));
    let time_anomalies = check_arrival_times(records);

    info!(
        errors = errors.total(),
        lines = line_stops.len(),
        bad_line = topology.topology().is_none(),
        transfers = transfers.as_ref().map_or(0, Vec::len),
        time_anomalies = time_anomalies.len(),
        "Schedule analyzed"
    );

    ScheduleReport {
        records: records.len(),
        errors,
        line_stops,
        topology,
        transfers,
        time_anomalies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, LineKey};

    fn stop(bus_id: i64, name: &str, stop_type: &str, a_time: &str) -> StopRecord {
        StopRecord::default()
            .with(Field::BusId, bus_id)
            .with(Field::StopId, 1)
            .with(Field::StopName, name)
            .with(Field::NextStop, 0)
            .with(Field::StopType, stop_type)
            .with(Field::ArrivalTime, a_time)
    }

    #[test]
    fn test_empty_batch() {
        let report = analyze(&[]);
        assert_eq!(report.records, 0);
        assert_eq!(report.errors.total(), 0);
        assert!(report.line_stops.is_empty());
        assert_eq!(report.transfers, Some(vec![]));
        assert!(report.time_anomalies.is_empty());
    }

    #[test]
    fn test_bad_line_skips_transfers_only() {
        let records = vec![
            stop(1, "Elm Street", "S", "08:00"),
            stop(1, "Abbey Road", "", "07:00"),
            stop(2, "Elm Street", "F", "09:00"),
        ];
        let report = analyze(&records);

        assert!(matches!(report.topology, TopologyOutcome::BadLine(_)));
        assert_eq!(report.transfers, None);
        assert_eq!(report.line_stops.len(), 2);
        assert_eq!(report.time_anomalies[&LineKey::Id(1)], "Abbey Road");
    }

    #[test]
    fn test_good_batch_has_transfers() {
        let records = vec![
            stop(1, "Elm Street", "S", "08:00"),
            stop(1, "Abbey Road", "F", "08:10"),
            stop(2, "Orchard Road", "S", "09:00"),
            stop(2, "Abbey Road", "F", "09:10"),
        ];
        let report = analyze(&records);

        assert_eq!(report.transfers, Some(vec!["Abbey Road".to_string()]));
        assert_eq!(report.errors.total(), 0);
    }
}
