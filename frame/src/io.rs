//! CSV ingestion and persistence.
//!
//! Reads apply best-effort coercion: hinted columns parse to the hinted
//! kind, timestamp columns parse ISO 8601, everything else is sniffed
//! int → float → text. An empty field or an uncoercible value becomes
//! [`Value::Null`] rather than failing the read.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use crate::table::Frame;
use crate::value::Value;

/// Desired parse for a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    /// Parse as numeric and truncate to integer (accepts decimal text).
    Integer,
    Float,
    Text,
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 date-time or date (midnight) string.
pub fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_field(raw: &str, hint: Option<TypeHint>, is_timestamp: bool) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if is_timestamp {
        return parse_iso(raw).map_or(Value::Null, Value::Timestamp);
    }
    match hint {
        Some(TypeHint::Integer) => raw
            .parse::<f64>()
            .map_or(Value::Null, |value| Value::Int(value as i64)),
        Some(TypeHint::Float) => raw.parse::<f64>().map_or(Value::Null, Value::Float),
        Some(TypeHint::Text) => Value::Text(raw.to_string()),
        None => Value::sniff(raw),
    }
}

impl Frame {
    /// Read a CSV file with a header row.
    ///
    /// `hints` requests a parse per column name; `timestamp_columns` parse
    /// as ISO 8601. Columns named in neither are sniffed per value.
    pub fn read_csv(
        path: &Path,
        hints: &[(&str, TypeHint)],
        timestamp_columns: &[&str],
    ) -> Result<Frame> {
        let mut reader = csv::ReaderBuilder::new()
            .from_path(path)
            .with_context(|| format!("open {}", path.display()))?;
        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("read header of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut columns: IndexMap<String, Vec<Value>> = headers
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        let column_hints: Vec<(Option<TypeHint>, bool)> = headers
            .iter()
            .map(|name| {
                let hint = hints
                    .iter()
                    .find(|(hinted, _)| *hinted == name.as_str())
                    .map(|(_, hint)| *hint);
                let is_timestamp = timestamp_columns.contains(&name.as_str());
                (hint, is_timestamp)
            })
            .collect();

        for record in reader.records() {
            let record = record.with_context(|| format!("read record of {}", path.display()))?;
            for (index, values) in columns.values_mut().enumerate() {
                let raw = record.get(index).unwrap_or("");
                let (hint, is_timestamp) = column_hints[index];
                values.push(parse_field(raw, hint, is_timestamp));
            }
        }
        Frame::from_columns(columns)
    }

    /// Write the frame as CSV, creating missing parent directories.
    ///
    /// Timestamps serialize in ISO 8601, nulls as empty fields. An
    /// existing file at `path` is overwritten.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("create {}", path.display()))?;
        let names = self.columns();
        writer
            .write_record(&names)
            .with_context(|| format!("write header of {}", path.display()))?;
        for row in 0..self.len() {
            let fields: Vec<String> = names
                .iter()
                .map(|name| self.get(name, row).map_or_else(String::new, Value::to_string))
                .collect();
            writer
                .write_record(&fields)
                .with_context(|| format!("write row {} of {}", row, path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flush {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("raw.csv");
        fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn empty_fields_become_null() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(temp.path(), "a,b\n1,\n,x\n");
        let frame = Frame::read_csv(&path, &[], &[]).expect("read");
        assert_eq!(frame.get("b", 0), Some(&Value::Null));
        assert_eq!(frame.get("a", 1), Some(&Value::Null));
    }

    #[test]
    fn hints_coerce_and_degrade_to_null() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(temp.path(), "id,score,tag\n3.0,2.5,07\nx,y,z\n");
        let frame = Frame::read_csv(
            &path,
            &[
                ("id", TypeHint::Integer),
                ("score", TypeHint::Float),
                ("tag", TypeHint::Text),
            ],
            &[],
        )
        .expect("read");
        assert_eq!(frame.get("id", 0), Some(&Value::Int(3)));
        assert_eq!(frame.get("score", 0), Some(&Value::Float(2.5)));
        assert_eq!(frame.get("tag", 0), Some(&Value::Text("07".to_string())));
        assert_eq!(frame.get("id", 1), Some(&Value::Null));
        assert_eq!(frame.get("score", 1), Some(&Value::Null));
    }

    #[test]
    fn unhinted_columns_are_sniffed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(temp.path(), "v\n3\n2.5\n10-7\n");
        let frame = Frame::read_csv(&path, &[], &[]).expect("read");
        assert_eq!(frame.get("v", 0), Some(&Value::Int(3)));
        assert_eq!(frame.get("v", 1), Some(&Value::Float(2.5)));
        assert_eq!(frame.get("v", 2), Some(&Value::Text("10-7".to_string())));
    }

    #[test]
    fn timestamp_columns_parse_iso_only() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(
            temp.path(),
            "date\n2021-03-14\n2021-03-14T13:30:00\nnot-a-date\n",
        );
        let frame = Frame::read_csv(&path, &[], &["date"]).expect("read");
        assert_eq!(
            frame.get("date", 0).and_then(Value::as_timestamp),
            parse_iso("2021-03-14")
        );
        assert_eq!(
            frame.get("date", 1).and_then(Value::as_timestamp),
            parse_iso("2021-03-14T13:30:00")
        );
        assert_eq!(frame.get("date", 2), Some(&Value::Null));
    }

    #[test]
    fn write_round_trips_and_creates_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = write_fixture(temp.path(), "id,when,note\n1,2021-03-14T13:30:00,fast\n2,,\n");
        let frame = Frame::read_csv(&source, &[("id", TypeHint::Integer)], &["when"]).expect("read");

        let target = temp.path().join("nested/out/clean.csv");
        frame.write_csv(&target).expect("write");
        let written = fs::read_to_string(&target).expect("read back");
        assert_eq!(written, "id,when,note\n1,2021-03-14T13:30:00,fast\n2,,\n");
    }
}
