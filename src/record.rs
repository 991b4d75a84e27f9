//! Stop records as they arrive from the decoder.
//!
//! Values are kept loosely typed: every field's declared type is something
//! the validators check, not something the decoder guarantees.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use crate::validate::{StopTypeContext, Validator};

/// Identifier of a line whose `bus_id` passed validation.
///
/// Wide enough for every JSON integer, signed or unsigned 64-bit.
pub type LineId = i128;

/// The six fields of a schedule entry, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    BusId,
    StopId,
    StopName,
    NextStop,
    StopType,
    #[serde(rename = "a_time")]
    ArrivalTime,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::BusId,
        Field::StopId,
        Field::StopName,
        Field::NextStop,
        Field::StopType,
        Field::ArrivalTime,
    ];

    /// Name of the field on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Field::BusId => "bus_id",
            Field::StopId => "stop_id",
            Field::StopName => "stop_name",
            Field::NextStop => "next_stop",
            Field::StopType => "stop_type",
            Field::ArrivalTime => "a_time",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Mandatory fields are additionally checked for the empty string.
    /// `stop_type` is optional: an empty value means an ordinary stop.
    pub fn is_required(self) -> bool {
        !matches!(self, Field::StopType)
    }

    /// Fields whose value must match a textual format, not just a type.
    pub fn has_format(self) -> bool {
        matches!(
            self,
            Field::StopName | Field::StopType | Field::ArrivalTime
        )
    }

    pub fn validator(self) -> Validator {
        match self {
            Field::BusId | Field::StopId | Field::NextStop => Validator::Integer,
            Field::StopName => Validator::StopName,
            Field::StopType => Validator::StopType(StopTypeContext::Optional),
            Field::ArrivalTime => Validator::ArrivalTime,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A loosely typed JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i128),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    /// Arrays and objects, kept as their JSON text.
    Composite(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_empty_str(&self) -> bool {
        matches!(self, FieldValue::Str(s) if s.is_empty())
    }

    /// Textual rendering used for string comparisons and display.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Str(s) => Cow::Borrowed(s),
            FieldValue::Composite(s) => Cow::Borrowed(s),
            FieldValue::Int(i) => Cow::Owned(i.to_string()),
            FieldValue::Float(x) => Cow::Owned(x.to_string()),
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
            FieldValue::Null => Cow::Borrowed("null"),
        }
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i128() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::Str(s.clone()),
            Value::Array(_) | Value::Object(_) => FieldValue::Composite(value.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// One schedule entry. A `None` field was absent from the input object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopRecord {
    pub bus_id: Option<FieldValue>,
    pub stop_id: Option<FieldValue>,
    pub stop_name: Option<FieldValue>,
    pub next_stop: Option<FieldValue>,
    pub stop_type: Option<FieldValue>,
    pub a_time: Option<FieldValue>,
}

impl StopRecord {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        match field {
            Field::BusId => self.bus_id.as_ref(),
            Field::StopId => self.stop_id.as_ref(),
            Field::StopName => self.stop_name.as_ref(),
            Field::NextStop => self.next_stop.as_ref(),
            Field::StopType => self.stop_type.as_ref(),
            Field::ArrivalTime => self.a_time.as_ref(),
        }
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        let slot = match field {
            Field::BusId => &mut self.bus_id,
            Field::StopId => &mut self.stop_id,
            Field::StopName => &mut self.stop_name,
            Field::NextStop => &mut self.next_stop,
            Field::StopType => &mut self.stop_type,
            Field::ArrivalTime => &mut self.a_time,
        };
        *slot = Some(value);
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.set(field, value.into());
        self
    }

    /// Present fields, in report order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// The line this record belongs to, if its `bus_id` is a valid integer.
    pub fn line_id(&self) -> Option<LineId> {
        self.bus_id
            .as_ref()
            .filter(|value| Field::BusId.validator().check(value))
            .and_then(FieldValue::as_int)
    }

    /// Stop name as text, empty when absent.
    pub fn stop_name_text(&self) -> String {
        self.stop_name
            .as_ref()
            .map(|value| value.as_text().into_owned())
            .unwrap_or_default()
    }
}

/// Grouping key over unvalidated `bus_id` values.
///
/// Integers sort numerically and before any textual key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineKey {
    Id(LineId),
    Other(String),
}

impl From<&FieldValue> for LineKey {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Int(i) => LineKey::Id(*i),
            other => LineKey::Other(other.as_text().into_owned()),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKey::Id(id) => write!(f, "{id}"),
            LineKey::Other(text) => f.write_str(text),
        }
    }
}

impl Serialize for LineKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
