//! Cell values and realized column kinds.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;

/// A single cell in a [`Frame`](crate::Frame) column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

/// Realized kind of a column, derived from its non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Int,
    Float,
    Text,
    Timestamp,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view: `Int` widens to `f64`, everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// Best-effort parse of a raw text field: int, then float, then text.
    pub fn sniff(raw: &str) -> Value {
        if let Ok(value) = raw.parse::<i64>() {
            return Value::Int(value);
        }
        if let Ok(value) = raw.parse::<f64>() {
            return Value::Float(value);
        }
        Value::Text(raw.to_string())
    }

    /// Total order used by stable sorts.
    ///
    /// Nulls sort first, then numerics (`Int` and `Float` compare against
    /// each other as `f64`), then timestamps, then text. Sort keys in
    /// practice are single-kind columns; the cross-kind ranking only
    /// exists to keep the order total.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Int(left), Value::Int(right)) => left.cmp(right),
            (Value::Timestamp(left), Value::Timestamp(right)) => left.cmp(right),
            (Value::Text(left), Value::Text(right)) => left.cmp(right),
            (left, right) => match (left.as_f64(), right.as_f64()) {
                (Some(left), Some(right)) => left.total_cmp(&right),
                _ => left.rank().cmp(&right.rank()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Timestamp(_) => 2,
            Value::Text(_) => 3,
        }
    }

    fn kind(&self) -> Option<DataKind> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(DataKind::Int),
            Value::Float(_) => Some(DataKind::Float),
            Value::Text(_) => Some(DataKind::Text),
            Value::Timestamp(_) => Some(DataKind::Timestamp),
        }
    }
}

impl fmt::Display for Value {
    /// The CSV rendering: null is empty, timestamps are ISO 8601.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value}"),
            Value::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// Realized kind of a column over all its non-null values.
///
/// Any text makes the column `Text`; a float among numerics makes it
/// `Float`; otherwise the single observed kind wins. Mixing timestamps
/// with numerics also realizes as `Text` since no better kind describes
/// the column. Returns `None` for a fully-null column.
pub(crate) fn column_kind(values: &[Value]) -> Option<DataKind> {
    let mut realized: Option<DataKind> = None;
    for value in values {
        let Some(kind) = value.kind() else { continue };
        realized = Some(match (realized, kind) {
            (None, kind) => kind,
            (Some(current), kind) if current == kind => current,
            (Some(DataKind::Int), DataKind::Float) | (Some(DataKind::Float), DataKind::Int) => {
                DataKind::Float
            }
            _ => return Some(DataKind::Text),
        });
    }
    realized
}
