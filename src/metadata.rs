//! Cell type inference for loaded snapshots.
//!
//! Every cell is typed on its own, so a column holding `2019` and `abc`
//! keeps an integer and a string. A cell only takes a non-string type when
//! that type renders back to the exact source text; anything else (leading
//! zeros, `Yes`, `15/01/2019`, integers past `i64`) stays a string and is
//! written out untouched.

use chrono::{NaiveDate, NaiveDateTime};

use crate::data::Value;

const CANONICAL_DATE: &str = "%Y-%m-%d";
const CANONICAL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Boolean,
    Integer,
    Float,
    Date,
    DateTime,
}

impl Candidate {
    const ORDER: [Candidate; 5] = [
        Candidate::Boolean,
        Candidate::Integer,
        Candidate::Float,
        Candidate::Date,
        Candidate::DateTime,
    ];

    fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Candidate::Boolean => match raw {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            Candidate::Integer => raw.parse::<i64>().ok().map(Value::Integer),
            Candidate::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            Candidate::Date => NaiveDate::parse_from_str(raw, CANONICAL_DATE)
                .ok()
                .map(Value::Date),
            Candidate::DateTime => NaiveDateTime::parse_from_str(raw, CANONICAL_DATETIME)
                .ok()
                .map(Value::DateTime),
        }
    }
}

/// Narrowest lossless value for one raw cell. Empty cells are null.
pub fn infer_value(raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    let typed = Candidate::ORDER
        .iter()
        .filter_map(|candidate| candidate.parse(raw))
        .find(|value| value.as_display() == raw);
    Some(typed.unwrap_or_else(|| Value::String(raw.to_string())))
}
