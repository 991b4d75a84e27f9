//! Report rendering and persistence.
//!
//! Supports the plain-text reports of each stage, JSON serialization of a
//! full run, and CSV append of error tallies.

use anyhow::Result;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::schedule::TimeAnomalies;
use crate::analyzers::topology::Topology;
use crate::analyzers::types::{ScheduleReport, TopologyOutcome};
use crate::record::LineId;
use crate::stats::{ErrorTally, TallyRow};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

pub fn render_errors(tally: &ErrorTally) -> String {
    let header = format!(
        "Type and required field validation: {} errors",
        tally.total()
    );
    with_header(header, tally.per_field().into_iter().map(|(field, n)| format!("{field}: {n}")))
}

pub fn render_format_errors(tally: &ErrorTally) -> String {
    let header = format!("Format validation: {} errors", tally.format_total());
    with_header(header, tally.format_errors().into_iter().map(|(field, n)| format!("{field}: {n}")))
}

pub fn render_line_stops(line_stops: &BTreeMap<LineId, usize>) -> String {
    with_header(
        "Line names and number of stops:".to_string(),
        line_stops
            .iter()
            .map(|(line, n)| format!("bus_id: {line}, stops: {n}")),
    )
}

/// Start, transfer and finish stop lists.
pub fn render_stops(topology: &Topology, transfers: &[String]) -> String {
    [
        ("Start", topology.starts.as_slice()),
        ("Transfer", transfers),
        ("Finish", topology.finishes.as_slice()),
    ]
    .iter()
    .map(|(label, names)| format!("{label} stops: {} {}", names.len(), quoted_list(names)))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn render_time_anomalies(anomalies: &TimeAnomalies) -> String {
    let header = "Arrival time test:".to_string();
    if anomalies.is_empty() {
        return with_header(header, ["OK".to_string()]);
    }
    with_header(
        header,
        anomalies
            .iter()
            .map(|(line, stop)| format!("bus_id line {line}: wrong time on station {stop}")),
    )
}

/// All stage reports, separated by blank lines.
pub fn render_report(report: &ScheduleReport) -> String {
    let stops = match (&report.topology, &report.transfers) {
        (TopologyOutcome::Ok(topology), Some(transfers)) => render_stops(topology, transfers),
        (TopologyOutcome::BadLine(err), _) => err.to_string(),
        (TopologyOutcome::Ok(topology), None) => render_stops(topology, &[]),
    };

    [
        render_errors(&report.errors),
        render_format_errors(&report.errors),
        render_line_stops(&report.line_stops),
        stops,
        render_time_anomalies(&report.time_anomalies),
    ]
    .join("\n\n")
}

/// One line per item under a header line.
fn with_header(header: String, lines: impl IntoIterator<Item = String>) -> String {
    std::iter::once(header)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `['A', 'B']`
fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<_> = names.iter().map(|name| format!("'{name}'")).collect();
    format!("[{}]", quoted.join(", "))
}

pub fn to_json(report: &ScheduleReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Appends a [`TallyRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, row: &TallyRow) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::analyzer::analyze;
    use crate::error::{TopologyError, TopologyReason};
    use crate::record::{Field, LineKey, StopRecord};
    use std::fs;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_empty_tally() {
        let out = render_errors(&ErrorTally::default());
        assert_eq!(
            out,
            "Type and required field validation: 0 errors\n\
             bus_id: 0\nstop_id: 0\nstop_name: 0\nnext_stop: 0\nstop_type: 0\na_time: 0"
        );
    }

    #[test]
    fn test_render_format_errors_lists_format_fields() {
        let out = render_format_errors(&ErrorTally::default());
        assert_eq!(
            out,
            "Format validation: 0 errors\nstop_name: 0\nstop_type: 0\na_time: 0"
        );
    }

    #[test]
    fn test_render_line_stops() {
        let counts = BTreeMap::from([(512, 2), (128, 4)]);
        assert_eq!(
            render_line_stops(&counts),
            "Line names and number of stops:\nbus_id: 128, stops: 4\nbus_id: 512, stops: 2"
        );
    }

    #[test]
    fn test_render_stops_uses_quoted_lists() {
        let topology = Topology {
            starts: names(&["Bourbon Street", "Pilotow Street"]),
            finishes: names(&["Sesame Street"]),
            ..Default::default()
        };
        assert_eq!(
            render_stops(&topology, &[]),
            "Start stops: 2 ['Bourbon Street', 'Pilotow Street']\n\
             Transfer stops: 0 []\n\
             Finish stops: 1 ['Sesame Street']"
        );
    }

    #[test]
    fn test_render_time_anomalies() {
        assert_eq!(
            render_time_anomalies(&TimeAnomalies::new()),
            "Arrival time test:\nOK"
        );

        let anomalies = TimeAnomalies::from([(LineKey::Id(128), "Fifth Avenue".to_string())]);
        assert_eq!(
            render_time_anomalies(&anomalies),
            "Arrival time test:\nbus_id line 128: wrong time on station Fifth Avenue"
        );
    }

    #[test]
    fn test_nameless_station_is_never_blank() {
        let records = vec![
            StopRecord::default()
                .with(Field::BusId, 1)
                .with(Field::StopName, "Elm Street")
                .with(Field::ArrivalTime, "09:00"),
            StopRecord::default()
                .with(Field::BusId, 1)
                .with(Field::ArrivalTime, "08:00"),
        ];
        let out = render_time_anomalies(&analyze(&records).time_anomalies);
        assert_eq!(
            out,
            "Arrival time test:\nbus_id line 1: wrong time on station record 1"
        );
    }

    #[test]
    fn test_render_report_shows_bad_line() {
        let records = vec![
            StopRecord::default()
                .with(Field::BusId, 4)
                .with(Field::StopName, "Elm Street")
                .with(Field::StopType, "S"),
        ];
        let out = render_report(&analyze(&records));
        let expected = TopologyError {
            line: 4,
            reason: TopologyReason::MissingStartOrFinish,
        };
        assert!(out.contains(&expected.to_string()));
        assert!(out.contains("Arrival time test:\nOK"));
    }

    #[test]
    fn test_to_json_has_stage_keys() {
        let json = to_json(&analyze(&[])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in ["errors", "line_stops", "topology", "transfers", "time_anomalies"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["topology"]["status"], "ok");
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tallies.csv");

        let row = TallyRow::new(&ErrorTally::default(), 0);
        append_record(&path, &row).unwrap();
        append_record(&path, &row).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,source,records,total"));
    }
}
