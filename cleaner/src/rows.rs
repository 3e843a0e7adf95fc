//! Row filter: eliminate rows that cannot participate in a valid race.
//!
//! The essential-null drop runs before the positivity drop; positivity
//! on a null field would otherwise need its own null handling. Nulls
//! produced by the field normalizer are eliminated here, not earlier.

use anyhow::Result;
use frame::{Frame, Value};
use tracing::debug;

use crate::schema::Schema;

/// Columns a row cannot be missing.
pub const ESSENTIAL_COLUMNS: [&str; 6] = [
    "race_id",
    "horse_id",
    "date",
    "race_time",
    "n_runners",
    "distance",
];

/// Columns that must be strictly positive. A null here also drops the
/// row: null is not positive.
pub const POSITIVE_COLUMNS: [&str; 3] = ["age", "distance", "n_runners"];

/// Drop invalid rows, then project to the schema's ordered columns.
///
/// Declared columns absent from the table are materialized as all-null
/// so the output shape is always the registry's.
pub fn filter_rows(table: Frame, schema: &Schema) -> Result<Frame> {
    let before = table.len();

    let mut mask = vec![true; table.len()];
    for name in ESSENTIAL_COLUMNS {
        let values = column(&table, name)?;
        for (row, value) in values.iter().enumerate() {
            if value.is_null() {
                mask[row] = false;
            }
        }
    }
    let table = table.filter(&mask)?;

    let mut mask = vec![true; table.len()];
    for name in POSITIVE_COLUMNS {
        let values = column(&table, name)?;
        for (row, value) in values.iter().enumerate() {
            if !value.as_f64().is_some_and(|number| number > 0.0) {
                mask[row] = false;
            }
        }
    }
    let mut table = table.filter(&mask)?;

    for name in schema.ordered_columns() {
        if !table.has_column(name) {
            table.set_column(name, vec![Value::Null; table.len()])?;
        }
    }
    let cleaned = table.select(&schema.ordered_columns())?;

    debug!(
        before,
        after = cleaned.len(),
        dropped = before - cleaned.len(),
        "rows filtered"
    );
    Ok(cleaned)
}

fn column<'frame>(table: &'frame Frame, name: &str) -> Result<&'frame [Value]> {
    table
        .column(name)
        .ok_or_else(|| anyhow::anyhow!("missing column {}", name))
}
