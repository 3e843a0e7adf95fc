//! Chronological ordering and persistence of the cleaned table.

use std::path::Path;

use anyhow::{Context, Result};
use frame::Frame;
use tracing::info;

use crate::schema::Schema;

/// Sort precedence for the persisted output.
pub const SORT_COLUMNS: [&str; 3] = ["date", "race_time", "race_id"];

/// Sort the cleaned table chronologically.
///
/// The sort is stable: rows tied on all three keys keep their original
/// relative order, so output is deterministic even though the key is not
/// globally unique.
pub fn chronological(cleaned: &Frame) -> Result<Frame> {
    cleaned.sort_by(&SORT_COLUMNS)
}

/// Write the schema's non-leak columns, in declared order, to `path`.
///
/// Missing destination directories are created; an existing file is
/// overwritten.
pub fn persist(ordered: &Frame, schema: &Schema, path: &Path) -> Result<()> {
    let output = ordered.select(&schema.non_leak_columns())?;
    output
        .write_csv(path)
        .with_context(|| format!("persist cleaned dataset {}", path.display()))?;
    info!(rows = output.len(), path = %path.display(), "cleaned dataset persisted");
    Ok(())
}
