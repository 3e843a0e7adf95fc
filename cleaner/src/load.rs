//! Raw dataset loading.

use std::path::Path;

use anyhow::{Context, Result};
use frame::Frame;
use tracing::info;

use crate::schema::Schema;

/// Load the raw dataset, coercing columns per the registry's load hints.
///
/// Coercion is best-effort: uncoercible values become null rather than
/// failing the load. Observation columns carry no hints and are sniffed
/// per value.
pub fn load_raw(path: &Path, schema: &Schema) -> Result<Frame> {
    let raw = Frame::read_csv(path, &schema.load_hints(), &[])
        .with_context(|| format!("load raw dataset {}", path.display()))?;
    info!(
        rows = raw.len(),
        columns = raw.columns().len(),
        path = %path.display(),
        "raw dataset loaded"
    );
    Ok(raw)
}
