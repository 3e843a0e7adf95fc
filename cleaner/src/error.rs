//! Fatal error kinds raised by the pipeline gates.

use thiserror::Error;

/// A fatal cleaning failure. The pipeline never continues past one of
/// these: every stage either completes fully or raises.
///
/// Per-value coercion failures are not errors at all: malformed field
/// values degrade to null and are dropped by the row filter.
#[derive(Error, Debug)]
pub enum CleanError {
    /// Required column missing, declared kind incompatible with the
    /// realized data, or the outcome-label source column absent.
    #[error("schema error: {0}")]
    Schema(String),

    /// Duplicate runner key, race-level field inconsistency, runner-count
    /// mismatch, or out-of-range finish position.
    #[error("integrity error: {0}")]
    Integrity(String),
}

impl CleanError {
    pub fn schema(message: impl Into<String>) -> CleanError {
        CleanError::Schema(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> CleanError {
        CleanError::Integrity(message.into())
    }
}
