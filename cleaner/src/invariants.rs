//! Per-race consistency checks on the fully cleaned table.
//!
//! Runs only after the field normalizer and row filter: every check here
//! assumes coerced types and no null essentials. Groups are visited in
//! order of first appearance and the first violating group raises.

use anyhow::Result;
use frame::{Frame, Value};
use tracing::debug;

use crate::error::CleanError;
use crate::schema;

/// Fields that must be identical across every runner in a race.
pub const INVARIANT_COLUMNS: [&str; 4] = ["date", "racecourse", "race_type_simple", "distance"];

/// Validate race-level invariants across all rows.
///
/// For each `race_id` group: the invariant fields have exactly one
/// distinct non-null value, the row count equals the declared
/// `n_runners`, and non-null finish positions lie in `[1, n_runners]`.
pub fn validate_race_invariants(cleaned: &Frame) -> Result<()> {
    for (race_id, group) in cleaned.group_by("race_id")? {
        for field in INVARIANT_COLUMNS {
            if group.distinct_non_null(field)? > 1 {
                return Err(CleanError::integrity(format!(
                    "race {race_id} has inconsistent {field}"
                ))
                .into());
            }
        }

        let declared = group
            .get("n_runners", 0)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if group.len() as i64 != declared {
            return Err(CleanError::integrity(format!(
                "race {race_id} expected {declared} runners but found {}",
                group.len()
            ))
            .into());
        }

        if let Some(positions) = group.column(schema::FINISH_POSITION) {
            let out_of_range = positions
                .iter()
                .filter_map(Value::as_i64)
                .any(|position| position < 1 || position > declared);
            if out_of_range {
                return Err(CleanError::integrity(format!(
                    "race {race_id} has finish positions outside [1, {declared}]"
                ))
                .into());
            }
        }
    }
    debug!(rows = cleaned.len(), "race invariants hold");
    Ok(())
}
