//! Field normalizer: per-value parsers for the irregular raw encodings.
//!
//! Every parser here is pure and total: null in, null out, and malformed
//! input degrades to null instead of raising. Elimination of the
//! resulting nulls is the row filter's job, not this module's.

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use frame::{Frame, Value};
use tracing::debug;

use crate::schema;

/// Status codes for runners that did not finish. Compared
/// case-insensitively after trimming.
const NON_FINISH_CODES: [&str; 14] = [
    "pu", "ur", "f", "bd", "ro", "ref", "voi", "lft", "su", "dsq", "dnf", "ot", "otd", "bf",
];

/// Bare clock times parse against this anchor date.
const TIME_ANCHOR: (i32, u32, u32) = (1900, 1, 1);

/// Parse a timestamp from an already-parsed value or its textual forms:
/// ISO 8601 date-time, ISO date (midnight), or a bare `%H:%M[:%S]` clock
/// time anchored to 1900-01-01.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Timestamp(parsed) => Some(*parsed),
        Value::Text(text) => {
            let text = text.trim();
            if let Some(parsed) = frame::parse_iso(text) {
                return Some(parsed);
            }
            for format in ["%H:%M", "%H:%M:%S"] {
                if let Ok(time) = NaiveTime::parse_from_str(text, format) {
                    let (year, month, day) = TIME_ANCHOR;
                    return NaiveDate::from_ymd_opt(year, month, day)
                        .map(|date| date.and_time(time));
                }
            }
            None
        }
        _ => None,
    }
}

/// Parse a weight expressed in pounds or as a `stones-pounds` composite
/// ("10-7" is 10 × 14 + 7 = 147).
pub fn parse_weight(value: &Value) -> Option<f64> {
    match value {
        Value::Int(pounds) => Some(*pounds as f64),
        Value::Float(pounds) => Some(*pounds),
        Value::Text(text) => {
            if text.contains('-') {
                let parts: Vec<&str> = text.split('-').collect();
                let [stones, pounds] = parts.as_slice() else {
                    return None;
                };
                let stones = stones.parse::<f64>().ok()?;
                let pounds = pounds.parse::<f64>().ok()?;
                return Some(stones * 14.0 + pounds);
            }
            text.parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Convert a race distance to yards.
///
/// Numeric values pass through as already-converted. Composite text like
/// "2m4f110y" accumulates digits into a magnitude closed by a unit
/// letter (`m` miles, `f` furlongs, `y` yards); unrecognized characters
/// are skipped, an unparsable magnitude contributes nothing, and a
/// trailing unit-less remainder is added as-is. The result must be
/// strictly positive.
pub fn parse_distance(value: &Value) -> Option<f64> {
    match value {
        Value::Int(yards) => Some(*yards as f64),
        Value::Float(yards) => Some(*yards),
        Value::Text(text) => {
            let text = text.trim().to_lowercase();
            let mut yards = 0.0;
            let mut magnitude = String::new();
            for ch in text.chars() {
                if ch.is_ascii_digit() || ch == '.' {
                    magnitude.push(ch);
                    continue;
                }
                let per_unit = match ch {
                    'm' => 1760.0,
                    'f' => 220.0,
                    'y' => 1.0,
                    _ => continue,
                };
                yards += magnitude.parse::<f64>().unwrap_or(0.0) * per_unit;
                magnitude.clear();
            }
            if !magnitude.is_empty()
                && let Ok(remainder) = magnitude.parse::<f64>()
            {
                yards += remainder;
            }
            (yards > 0.0).then_some(yards)
        }
        _ => None,
    }
}

/// Normalize a finishing position to a positive rank.
///
/// Non-finisher status codes and non-positive numerics map to null;
/// valid positive numerics round to the nearest whole position.
pub fn parse_finish(value: &Value) -> Option<i64> {
    let position = match value {
        Value::Int(position) => *position as f64,
        Value::Float(position) => *position,
        Value::Text(text) => {
            let text = text.trim().to_lowercase();
            if NON_FINISH_CODES.contains(&text.as_str()) {
                return None;
            }
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (position > 0.0).then(|| position.round() as i64)
}

/// Numeric coercion: anything that reads as a number becomes `f64`.
fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(number) => Some(*number as f64),
        Value::Float(number) => Some(*number),
        Value::Text(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer coercion: numeric values truncate toward zero.
fn coerce_int(value: &Value) -> Option<i64> {
    coerce_float(value).map(|number| number as i64)
}

/// Apply every field parser to the stripped table.
///
/// `finish_source` is the observation column retained by the leakage
/// filter; when present the outcome label is derived from it and the
/// source is dropped afterwards. Identifiers are coerced last.
pub fn normalize_fields(mut table: Frame, finish_source: Option<&str>) -> Result<Frame> {
    for name in ["date", "race_time"] {
        map_column(&mut table, name, |value| {
            parse_timestamp(value).map_or(Value::Null, Value::Timestamp)
        })?;
    }
    for name in ["age", "draw"] {
        map_column(&mut table, name, |value| {
            coerce_float(value).map_or(Value::Null, Value::Float)
        })?;
    }
    map_column(&mut table, "weight_lbs", |value| {
        parse_weight(value).map_or(Value::Null, Value::Float)
    })?;
    map_column(&mut table, "distance", |value| {
        parse_distance(value).map_or(Value::Null, Value::Float)
    })?;

    let source = finish_source.unwrap_or(schema::FINISH_POSITION);
    let finish: Vec<Value> = table
        .column(source)
        .ok_or_else(|| anyhow!("missing column {}", source))?
        .iter()
        .map(|value| parse_finish(value).map_or(Value::Null, Value::Int))
        .collect();
    table.set_column(schema::FINISH_POSITION, finish)?;
    if let Some(source) = finish_source
        && source != schema::FINISH_POSITION
    {
        table.drop_column(source)?;
    }

    for name in ["n_runners", "race_id", "horse_id"] {
        map_column(&mut table, name, |value| {
            coerce_int(value).map_or(Value::Null, Value::Int)
        })?;
    }

    debug!(rows = table.len(), "fields normalized");
    Ok(table)
}

fn map_column(table: &mut Frame, name: &str, map: impl Fn(&Value) -> Value) -> Result<()> {
    let values: Vec<Value> = table
        .column(name)
        .ok_or_else(|| anyhow!("missing column {}", name))?
        .iter()
        .map(map)
        .collect();
    table.set_column(name, values)
}
