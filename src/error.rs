use serde::Serialize;
use thiserror::Error;

use crate::record::LineId;

/// Why a line failed the start/finish check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyReason {
    DuplicateStart,
    DuplicateFinish,
    MissingStartOrFinish,
}

impl std::fmt::Display for TopologyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TopologyReason::DuplicateStart => "duplicate start",
            TopologyReason::DuplicateFinish => "duplicate finish",
            TopologyReason::MissingStartOrFinish => "missing start or finish",
        })
    }
}

/// A line without exactly one start and one finish stop.
///
/// Aborts the topology and transfer stages for the whole batch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("bad line {line}: {reason}")]
pub struct TopologyError {
    pub line: LineId,
    pub reason: TopologyReason,
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of stop records, found {found}")]
    NotAnArray { found: &'static str },

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
}
