//! Per-field type and format predicates.
//!
//! Every predicate fails closed: a value of the wrong runtime type or a
//! malformed string is simply invalid, never an error.

use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

use crate::record::FieldValue;

/// One or more capitalised words followed by a street suffix.
static STOP_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Z][a-z]* )+(?:Boulevard|Street|Avenue|Road)$")
        .expect("stop name pattern compiles")
});

/// Whether a `stop_type` value is checked as a filled-in, required role or
/// as the optional field it is in schedule records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopTypeContext {
    /// Only `S`, `O` or `F`.
    Required,
    /// Also accepts an empty or blank placeholder.
    Optional,
}

/// Validator kinds, chosen per field by [`crate::record::Field::validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Integer,
    StopName,
    StopType(StopTypeContext),
    ArrivalTime,
}

impl Validator {
    pub fn check(self, value: &FieldValue) -> bool {
        match self {
            Validator::Integer => is_integer(value),
            Validator::StopName => is_stop_name(value),
            Validator::StopType(context) => is_stop_type(value, context),
            Validator::ArrivalTime => is_arrival_time(value),
        }
    }
}

/// True only for JSON integers. Numeric strings, floats and booleans fail.
pub fn is_integer(value: &FieldValue) -> bool {
    matches!(value, FieldValue::Int(_))
}

pub fn is_stop_name(value: &FieldValue) -> bool {
    value.as_str().is_some_and(|s| STOP_NAME.is_match(s))
}

pub fn is_stop_type(value: &FieldValue, context: StopTypeContext) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    match context {
        StopTypeContext::Required => matches!(s, "S" | "O" | "F"),
        StopTypeContext::Optional => matches!(s, "" | " " | "S" | "O" | "F"),
    }
}

/// `HH:MM` on a 24-hour clock, zero padded, exactly five characters.
pub fn is_arrival_time(value: &FieldValue) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());

    shaped && NaiveTime::parse_from_str(s, "%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> FieldValue {
        FieldValue::Str(text.to_string())
    }

    #[test]
    fn test_integer_rejects_lookalikes() {
        assert!(is_integer(&FieldValue::Int(0)));
        assert!(is_integer(&FieldValue::Int(-5)));
        assert!(!is_integer(&s("7")));
        assert!(!is_integer(&s("")));
        assert!(!is_integer(&FieldValue::Float(7.0)));
        assert!(!is_integer(&FieldValue::Bool(true)));
        assert!(!is_integer(&FieldValue::Null));
    }

    #[test]
    fn test_stop_name_grammar() {
        for ok in [
            "Prospekt Avenue",
            "Sunset Boulevard",
            "Abbey Road",
            "Santa Monica Boulevard",
            "Khao San Road",
        ] {
            assert!(is_stop_name(&s(ok)), "{ok} should be valid");
        }
        for bad in [
            "",
            "Elm",
            "Prospekt Av.",
            "bourbon street",
            "Sesame street",
            "Street",
            "Elm  Street",
            " Elm Street",
            "Elm Street ",
            "Elm Street Extra",
            "ELm Street",
        ] {
            assert!(!is_stop_name(&s(bad)), "{bad:?} should be invalid");
        }
        assert!(!is_stop_name(&FieldValue::Int(5)));
    }

    #[test]
    fn test_stop_type_contexts() {
        for ok in ["S", "O", "F"] {
            assert!(is_stop_type(&s(ok), StopTypeContext::Required));
            assert!(is_stop_type(&s(ok), StopTypeContext::Optional));
        }
        assert!(is_stop_type(&s(""), StopTypeContext::Optional));
        assert!(is_stop_type(&s(" "), StopTypeContext::Optional));
        assert!(!is_stop_type(&s(""), StopTypeContext::Required));
        assert!(!is_stop_type(&s(" "), StopTypeContext::Required));

        for bad in ["OO", "A", "s", "SO"] {
            assert!(!is_stop_type(&s(bad), StopTypeContext::Optional));
        }
        assert!(!is_stop_type(&FieldValue::Int(5), StopTypeContext::Optional));
    }

    #[test]
    fn test_arrival_time_format() {
        for ok in ["00:00", "08:12", "23:59"] {
            assert!(is_arrival_time(&s(ok)), "{ok} should be valid");
        }
        for bad in ["", "8:19", "08:77", "10.12", "38:13", "24:00", "08:1a", " 8:19", "08:190"] {
            assert!(!is_arrival_time(&s(bad)), "{bad:?} should be invalid");
        }
        assert!(!is_arrival_time(&FieldValue::Float(8.12)));
    }

    #[test]
    fn test_validator_dispatch() {
        assert!(Validator::Integer.check(&FieldValue::Int(1)));
        assert!(Validator::StopName.check(&s("Elm Street")));
        assert!(!Validator::StopType(StopTypeContext::Required).check(&s("")));
        assert!(Validator::ArrivalTime.check(&s("09:45")));
    }
}
