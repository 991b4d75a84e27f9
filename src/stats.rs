use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::record::{Field, StopRecord};

/// Per-field error counts for a batch of records.
///
/// Type/format failures and required-but-empty values are counted in
/// separate layers. A value is only checked for emptiness once it has
/// passed its validator, so one value never counts twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorTally {
    pub type_errors: BTreeMap<Field, usize>,
    pub empty_errors: BTreeMap<Field, usize>,
}

impl ErrorTally {
    pub fn from_records(records: &[StopRecord]) -> Self {
        let tally = records
            .iter()
            .fold(ErrorTally::default(), |tally, record| tally.with_record(record));

        debug!(
            records = records.len(),
            total = tally.total(),
            "Field validation tallied"
        );
        tally
    }

    /// Folds one record into the tally.
    pub fn with_record(mut self, record: &StopRecord) -> Self {
        for (field, value) in record.fields() {
            if !field.validator().check(value) {
                *self.type_errors.entry(field).or_default() += 1;
            } else if field.is_required() && value.is_empty_str() {
                *self.empty_errors.entry(field).or_default() += 1;
            }
        }
        self
    }

    /// Combines two tallies, e.g. from separately checked partitions.
    pub fn merge(mut self, other: ErrorTally) -> Self {
        for (field, n) in other.type_errors {
            *self.type_errors.entry(field).or_default() += n;
        }
        for (field, n) in other.empty_errors {
            *self.empty_errors.entry(field).or_default() += n;
        }
        self
    }

    pub fn type_errors_for(&self, field: Field) -> usize {
        self.type_errors.get(&field).copied().unwrap_or(0)
    }

    pub fn empty_errors_for(&self, field: Field) -> usize {
        self.empty_errors.get(&field).copied().unwrap_or(0)
    }

    pub fn total_for(&self, field: Field) -> usize {
        self.type_errors_for(field) + self.empty_errors_for(field)
    }

    pub fn total(&self) -> usize {
        Field::ALL.iter().map(|&field| self.total_for(field)).sum()
    }

    /// Combined count for every field, in report order.
    pub fn per_field(&self) -> Vec<(Field, usize)> {
        Field::ALL
            .iter()
            .map(|&field| (field, self.total_for(field)))
            .collect()
    }

    /// Type/format failures of the format-constrained fields only.
    pub fn format_errors(&self) -> Vec<(Field, usize)> {
        Field::ALL
            .iter()
            .filter(|field| field.has_format())
            .map(|&field| (field, self.type_errors_for(field)))
            .collect()
    }

    pub fn format_total(&self) -> usize {
        self.format_errors().iter().map(|(_, n)| n).sum()
    }
}

/// Flat CSV row for one validated batch.
#[derive(Debug, Default, Serialize)]
pub struct TallyRow {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub source: Option<String>,
    pub records: usize,
    pub total: usize,
    pub bus_id: usize,
    pub stop_id: usize,
    pub stop_name: usize,
    pub next_stop: usize,
    pub stop_type: usize,
    pub a_time: usize,
}

impl TallyRow {
    pub fn new(tally: &ErrorTally, records: usize) -> Self {
        TallyRow {
            timestamp: chrono::Utc::now(),
            source: None,
            records,
            total: tally.total(),
            bus_id: tally.total_for(Field::BusId),
            stop_id: tally.total_for(Field::StopId),
            stop_name: tally.total_for(Field::StopName),
            next_stop: tally.total_for(Field::NextStop),
            stop_type: tally.total_for(Field::StopType),
            a_time: tally.total_for(Field::ArrivalTime),
        }
    }

    /// Set where the batch was read from.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}
