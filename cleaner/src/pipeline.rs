//! Linear stage orchestration.
//!
//! Each stage fully consumes its input table and produces the next; a
//! failing gate aborts the run before the persister, so no partial
//! output file is ever written.

use std::path::Path;

use anyhow::Result;
use frame::Frame;
use tracing::{info, instrument};

use crate::schema::Schema;
use crate::{invariants, leakage, load, normalize, output, rows, validate};

/// Run the full cleaning pipeline from `input` to `output_path`.
///
/// Returns the table exactly as persisted.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn run(input: &Path, output_path: &Path) -> Result<Frame> {
    let schema = Schema::race_records();

    let raw = load::load_raw(input, &schema)?;
    validate::validate_schema(&raw, &schema)?;
    let (stripped, finish_source) = leakage::strip_observations(raw)?;
    let normalized = normalize::normalize_fields(stripped, finish_source.as_deref())?;
    let cleaned = rows::filter_rows(normalized, &schema)?;
    invariants::validate_race_invariants(&cleaned)?;
    let ordered = output::chronological(&cleaned)?;
    output::persist(&ordered, &schema, output_path)?;

    info!(
        rows = ordered.len(),
        input = %input.display(),
        output = %output_path.display(),
        "cleaning pipeline finished"
    );
    Ok(ordered)
}
