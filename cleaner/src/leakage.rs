//! Leakage gate: no post-race observation reaches the cleaned table.
//!
//! Every `obs__*` column is stripped, with one exception: when no
//! outcome column exists yet, the designated finish-position source
//! survives just long enough for the field normalizer to derive the
//! label from it. The normalizer drops it after consumption.

use anyhow::Result;
use frame::Frame;
use tracing::debug;

use crate::error::CleanError;
use crate::schema;

/// Strip observation columns from `raw`.
///
/// Returns the stripped frame and, when retained, the name of the
/// finish-position source column the normalizer must consume and drop.
/// Fails when neither the source nor an existing outcome column can
/// provide the label.
pub fn strip_observations(mut raw: Frame) -> Result<(Frame, Option<String>)> {
    let mut finish_source: Option<String> = None;
    let observation_columns: Vec<String> = raw
        .columns()
        .into_iter()
        .filter(|name| schema::is_observation(name))
        .map(str::to_string)
        .collect();

    let has_outcome = raw.has_column(schema::FINISH_POSITION);
    for name in &observation_columns {
        if name == schema::FINISH_SOURCE && !has_outcome && finish_source.is_none() {
            finish_source = Some(name.clone());
            continue;
        }
        raw.drop_column(name)?;
    }

    if finish_source.is_none() && !has_outcome {
        return Err(CleanError::schema(format!(
            "finish position column missing; expected {} or {}",
            schema::FINISH_SOURCE,
            schema::FINISH_POSITION
        ))
        .into());
    }

    debug!(
        stripped = observation_columns.len(),
        retained_source = finish_source.as_deref().unwrap_or(""),
        "observation columns stripped"
    );
    Ok((raw, finish_source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame::Value;

    fn frame_with(columns: &[&str]) -> Frame {
        Frame::from_rows(
            columns,
            vec![columns.iter().map(|_| Value::Int(1)).collect()],
        )
        .expect("frame")
    }

    #[test]
    fn strips_all_observation_columns() {
        let raw = frame_with(&["race_id", "obs__finish_position", "obs__comment", "obs__sp"]);
        let (stripped, source) = strip_observations(raw).expect("strip");
        assert_eq!(stripped.columns(), vec!["race_id", "obs__finish_position"]);
        assert_eq!(source.as_deref(), Some("obs__finish_position"));
    }

    #[test]
    fn existing_outcome_column_wins_over_source() {
        let raw = frame_with(&["race_id", "finish_position", "obs__finish_position"]);
        let (stripped, source) = strip_observations(raw).expect("strip");
        assert_eq!(stripped.columns(), vec!["race_id", "finish_position"]);
        assert_eq!(source, None);
    }

    #[test]
    fn fails_when_no_label_source_exists() {
        let raw = frame_with(&["race_id", "obs__comment"]);
        let err = strip_observations(raw).expect_err("no source");
        assert!(matches!(
            err.downcast_ref::<CleanError>(),
            Some(CleanError::Schema(_))
        ));
        assert!(err.to_string().contains("finish position column missing"));
    }
}
