//! Minimal column-oriented tabular container.
//!
//! This crate provides the small dataframe surface the cleaning pipeline
//! needs and nothing more: ordered columns of dynamically-typed values,
//! boolean-mask filtering, first-seen-order group-by, stable multi-column
//! sorting, and CSV read/write with per-column type hints.
//!
//! - **[`value`]**: cell values ([`Value`]) and realized column kinds
//!   ([`DataKind`]). Pure data, no I/O.
//! - **[`table`]**: the in-memory table ([`Frame`]) and its operations.
//! - **[`io`]**: CSV ingestion ([`TypeHint`]-driven coercion) and
//!   persistence.
//!
//! Values never raise on malformed input at this layer: an uncoercible
//! field degrades to [`Value::Null`] and is left for callers to filter.

mod io;
mod table;
mod value;

pub use table::Frame;
pub use io::{TypeHint, parse_iso};
pub use value::{DataKind, Value};
