//! Declared schema for the race-record dataset.
//!
//! The registry is the single source of truth consulted by the loader,
//! the schema validator, and the persister: one ordered mapping from
//! column name to expected kind, plus the marker that identifies
//! post-race observation columns.

use frame::TypeHint;
use indexmap::IndexMap;

/// Prefix marking columns only knowable after the race concludes.
pub const OBS_PREFIX: &str = "obs__";

/// The persisted outcome label.
pub const FINISH_POSITION: &str = "finish_position";

/// The raw observation column the outcome label is derived from.
pub const FINISH_SOURCE: &str = "obs__finish_position";

/// Expected kind of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Timestamp,
}

/// Ordered mapping from required column name to expected kind.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: IndexMap<String, ColumnKind>,
}

impl Schema {
    /// The deployed race-record registry.
    pub fn race_records() -> Schema {
        let columns = [
            ("race_id", ColumnKind::Integer),
            ("horse_id", ColumnKind::Integer),
            ("date", ColumnKind::Timestamp),
            ("race_time", ColumnKind::Timestamp),
            ("racecourse", ColumnKind::Text),
            ("race_type_simple", ColumnKind::Text),
            ("distance", ColumnKind::Float),
            ("n_runners", ColumnKind::Integer),
            ("draw", ColumnKind::Float),
            ("age", ColumnKind::Float),
            ("weight_lbs", ColumnKind::Float),
            (FINISH_POSITION, ColumnKind::Integer),
        ]
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();
        Schema { columns }
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns.get(name).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// All declared column names, in stable output order.
    pub fn ordered_columns(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Declared columns allowed in the persisted output: everything
    /// without the observation prefix.
    pub fn non_leak_columns(&self) -> Vec<&str> {
        self.columns
            .keys()
            .map(String::as_str)
            .filter(|name| !is_observation(name))
            .collect()
    }

    /// Per-column CSV parse hints for the raw load.
    ///
    /// `date`/`race_time` stay text for explicit parsing during
    /// normalization, and `weight_lbs`/`distance` stay un-hinted so their
    /// composite encodings ("10-7", "2m4f110y") reach the field
    /// normalizer intact instead of degrading to null at the read.
    pub fn load_hints(&self) -> Vec<(&str, TypeHint)> {
        vec![
            ("race_id", TypeHint::Integer),
            ("horse_id", TypeHint::Integer),
            ("racecourse", TypeHint::Text),
            ("race_type_simple", TypeHint::Text),
            ("n_runners", TypeHint::Integer),
            ("draw", TypeHint::Float),
            ("age", TypeHint::Float),
        ]
    }
}

/// True for columns carrying the post-race observation marker.
pub fn is_observation(name: &str) -> bool {
    name.starts_with(OBS_PREFIX)
}
