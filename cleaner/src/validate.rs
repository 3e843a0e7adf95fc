//! Schema gate: presence, kind conformance, key uniqueness.
//!
//! Runs on the raw table before any normalization. Purely a gate: it
//! returns nothing and mutates nothing.

use anyhow::Result;
use frame::{DataKind, Frame};
use tracing::debug;

use crate::error::CleanError;
use crate::schema::{ColumnKind, Schema};

/// Runner rows are keyed by this pair.
pub const KEY_COLUMNS: [&str; 2] = ["race_id", "horse_id"];

/// Validate that required columns exist, have compatible kinds, and that
/// no duplicate `(race_id, horse_id)` pair exists.
///
/// The outcome label is exempt from the presence check: it is derived
/// later, and the leakage filter owns the error when no source for it
/// exists either.
pub fn validate_schema(raw: &Frame, schema: &Schema) -> Result<()> {
    let mut missing: Vec<&str> = schema
        .ordered_columns()
        .into_iter()
        .filter(|name| *name != crate::schema::FINISH_POSITION && !raw.has_column(name))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(CleanError::schema(format!(
            "missing required columns: {}",
            missing.join(", ")
        ))
        .into());
    }

    for (name, declared) in schema.columns() {
        let Some(realized) = raw.column_kind(name) else {
            continue;
        };
        if !compatible(declared, realized) {
            return Err(CleanError::schema(format!(
                "column {name} must be {declared:?}-like, found {realized:?}"
            ))
            .into());
        }
    }

    let duplicates = raw.duplicated(&KEY_COLUMNS)?;
    if let Some(row) = duplicates.iter().position(|flag| *flag) {
        let race_id = raw.get(KEY_COLUMNS[0], row).cloned().unwrap_or(frame::Value::Null);
        let horse_id = raw.get(KEY_COLUMNS[1], row).cloned().unwrap_or(frame::Value::Null);
        return Err(CleanError::integrity(format!(
            "duplicate (race_id, horse_id) pair ({race_id}, {horse_id})"
        ))
        .into());
    }

    debug!(rows = raw.len(), "schema validated");
    Ok(())
}

/// Declared-vs-realized compatibility.
///
/// Text is accepted for any declared kind since raw data may not yet be
/// coerced, and a realized `Int` satisfies a declared `Float` because
/// un-hinted sniffing realizes integer-valued numeric columns as `Int`.
fn compatible(declared: ColumnKind, realized: DataKind) -> bool {
    match declared {
        ColumnKind::Integer => matches!(realized, DataKind::Int | DataKind::Text),
        ColumnKind::Float => {
            matches!(realized, DataKind::Float | DataKind::Int | DataKind::Text)
        }
        ColumnKind::Text => matches!(realized, DataKind::Text),
        ColumnKind::Timestamp => matches!(realized, DataKind::Timestamp | DataKind::Text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame::Value;
    use indexmap::IndexMap;

    fn raw_frame(overrides: &[(&str, Vec<Value>)]) -> Frame {
        let schema = Schema::race_records();
        let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();
        for name in schema.ordered_columns() {
            let values = overrides
                .iter()
                .find(|(overridden, _)| *overridden == name)
                .map(|(_, values)| values.clone())
                .unwrap_or_else(|| default_column(name));
            columns.insert(name.to_string(), values);
        }
        for (name, values) in overrides {
            if !columns.contains_key(*name) {
                columns.insert((*name).to_string(), values.clone());
            }
        }
        Frame::from_columns(columns).expect("frame")
    }

    fn default_column(name: &str) -> Vec<Value> {
        match name {
            "race_id" => vec![Value::Int(1), Value::Int(1)],
            "horse_id" => vec![Value::Int(1), Value::Int(2)],
            "n_runners" | "finish_position" => vec![Value::Int(2), Value::Int(2)],
            "racecourse" | "race_type_simple" => vec![
                Value::Text("x".to_string()),
                Value::Text("x".to_string()),
            ],
            "date" | "race_time" => vec![
                Value::Text("2021-03-14".to_string()),
                Value::Text("2021-03-14".to_string()),
            ],
            _ => vec![Value::Float(1.0), Value::Float(2.0)],
        }
    }

    fn kind_of(err: &anyhow::Error) -> Option<&CleanError> {
        err.downcast_ref::<CleanError>()
    }

    #[test]
    fn accepts_conforming_frame() {
        let raw = raw_frame(&[]);
        validate_schema(&raw, &Schema::race_records()).expect("valid");
    }

    #[test]
    fn missing_columns_are_listed_sorted() {
        let schema = Schema::race_records();
        let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();
        for name in schema.ordered_columns() {
            if name == "age" || name == "draw" {
                continue;
            }
            columns.insert(name.to_string(), default_column(name));
        }
        let raw = Frame::from_columns(columns).expect("frame");

        let err = validate_schema(&raw, &schema).expect_err("missing");
        assert!(matches!(kind_of(&err), Some(CleanError::Schema(_))));
        assert!(err.to_string().contains("age, draw"));
    }

    #[test]
    fn absent_outcome_label_is_not_a_presence_failure() {
        let schema = Schema::race_records();
        let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();
        for name in schema.ordered_columns() {
            if name == "finish_position" {
                continue;
            }
            columns.insert(name.to_string(), default_column(name));
        }
        let raw = Frame::from_columns(columns).expect("frame");
        validate_schema(&raw, &schema).expect("label derived later");
    }

    #[test]
    fn text_satisfies_any_declared_kind() {
        let raw = raw_frame(&[(
            "distance",
            vec![
                Value::Text("2m4f110y".to_string()),
                Value::Text("1m".to_string()),
            ],
        )]);
        validate_schema(&raw, &Schema::race_records()).expect("text fallback");
    }

    #[test]
    fn int_satisfies_declared_float() {
        let raw = raw_frame(&[("weight_lbs", vec![Value::Int(147), Value::Int(140)])]);
        validate_schema(&raw, &Schema::race_records()).expect("int widening");
    }

    #[test]
    fn rejects_kind_clash() {
        let raw = raw_frame(&[("racecourse", vec![Value::Int(1), Value::Int(2)])]);
        let err = validate_schema(&raw, &Schema::race_records()).expect_err("kind clash");
        assert!(matches!(kind_of(&err), Some(CleanError::Schema(_))));
        assert!(err.to_string().contains("racecourse"));
    }

    #[test]
    fn rejects_duplicate_runner_key() {
        let raw = raw_frame(&[("horse_id", vec![Value::Int(20), Value::Int(20)])]);
        let err = validate_schema(&raw, &Schema::race_records()).expect_err("duplicate");
        assert!(matches!(kind_of(&err), Some(CleanError::Integrity(_))));
        assert!(err.to_string().contains("(1, 20)"));
    }
}
