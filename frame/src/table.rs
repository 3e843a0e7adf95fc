//! The in-memory table ([`Frame`]) and its operations.
//!
//! A [`Frame`] is an ordered set of equal-length columns. Operations
//! return new frames; callers treat frames as immutable between pipeline
//! stages. Row order is always preserved by filtering and grouping, and
//! sorting is stable, so downstream output is deterministic for a given
//! input.

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::value::{DataKind, Value, column_kind};

#[derive(Debug, Clone, Default)]
pub struct Frame {
    columns: IndexMap<String, Vec<Value>>,
    rows: usize,
}

/// Hashable projection of a [`Value`] for keyed operations (group-by,
/// duplicate detection, distinct counts). Floats key on their bit
/// pattern; parse failures never produce NaN, so bitwise equality is
/// value equality here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Null,
    Int(i64),
    Float(u64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Key {
    fn of(value: &Value) -> Key {
        match value {
            Value::Null => Key::Null,
            Value::Int(value) => Key::Int(*value),
            Value::Float(value) => Key::Float(value.to_bits()),
            Value::Text(value) => Key::Text(value.clone()),
            Value::Timestamp(value) => Key::Timestamp(*value),
        }
    }
}

impl Frame {
    /// Build a frame from named columns. All columns must share one length.
    pub fn from_columns(columns: IndexMap<String, Vec<Value>>) -> Result<Frame> {
        let rows = columns.values().next().map_or(0, Vec::len);
        for (name, values) in &columns {
            if values.len() != rows {
                return Err(anyhow!(
                    "column {} has {} rows, expected {}",
                    name,
                    values.len(),
                    rows
                ));
            }
        }
        Ok(Frame { columns, rows })
    }

    /// Build a frame from an ordered record list.
    pub fn from_rows(names: &[&str], rows: Vec<Vec<Value>>) -> Result<Frame> {
        let mut columns: IndexMap<String, Vec<Value>> = names
            .iter()
            .map(|name| ((*name).to_string(), Vec::with_capacity(rows.len())))
            .collect();
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(anyhow!(
                    "row {} has {} fields, expected {}",
                    index,
                    row.len(),
                    names.len()
                ));
            }
            for (values, value) in columns.values_mut().zip(row) {
                values.push(value);
            }
        }
        let rows = columns.values().next().map_or(0, Vec::len);
        Ok(Frame { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn get(&self, name: &str, row: usize) -> Option<&Value> {
        self.columns.get(name).and_then(|values| values.get(row))
    }

    /// Realized kind of a column; `None` when missing or fully null.
    pub fn column_kind(&self, name: &str) -> Option<DataKind> {
        self.columns.get(name).and_then(|values| column_kind(values))
    }

    /// Replace a column, or append it at the end when new.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(anyhow!(
                "column {} has {} rows, expected {}",
                name,
                values.len(),
                self.rows
            ));
        }
        self.rows = values.len();
        self.columns.insert(name.to_string(), values);
        Ok(())
    }

    /// Remove a column, preserving the order of the rest.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        self.columns
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| anyhow!("missing column {}", name))
    }

    /// Project to the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Frame> {
        let mut columns = IndexMap::with_capacity(names.len());
        for name in names {
            let values = self.require(name)?;
            columns.insert((*name).to_string(), values.to_vec());
        }
        Frame::from_columns(columns)
    }

    /// Keep the rows where `mask` is true.
    pub fn filter(&self, mask: &[bool]) -> Result<Frame> {
        if mask.len() != self.rows {
            return Err(anyhow!(
                "mask has {} entries, expected {}",
                mask.len(),
                self.rows
            ));
        }
        let indices: Vec<usize> = (0..self.rows).filter(|row| mask[*row]).collect();
        Ok(self.take_rows(&indices))
    }

    /// Stable sort by the given columns, in order of precedence.
    ///
    /// Ties keep their original relative order.
    pub fn sort_by(&self, keys: &[&str]) -> Result<Frame> {
        let key_columns: Vec<&[Value]> = keys
            .iter()
            .map(|name| self.require(name))
            .collect::<Result<_>>()?;
        let mut indices: Vec<usize> = (0..self.rows).collect();
        indices.sort_by(|left, right| {
            key_columns
                .iter()
                .map(|column| column[*left].total_cmp(&column[*right]))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(self.take_rows(&indices))
    }

    /// Group rows by a column, yielding `(key, sub-frame)` pairs in order
    /// of first appearance. Row order within a group follows the input.
    pub fn group_by(&self, key: &str) -> Result<Vec<(Value, Frame)>> {
        let values = self.require(key)?;
        let mut groups: IndexMap<Key, (Value, Vec<usize>)> = IndexMap::new();
        for (row, value) in values.iter().enumerate() {
            groups
                .entry(Key::of(value))
                .or_insert_with(|| (value.clone(), Vec::new()))
                .1
                .push(row);
        }
        Ok(groups
            .into_values()
            .map(|(value, indices)| (value, self.take_rows(&indices)))
            .collect())
    }

    /// Flag rows whose `subset` key has already been seen.
    pub fn duplicated(&self, subset: &[&str]) -> Result<Vec<bool>> {
        let key_columns: Vec<&[Value]> = subset
            .iter()
            .map(|name| self.require(name))
            .collect::<Result<_>>()?;
        let mut seen = HashSet::with_capacity(self.rows);
        let mut flags = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let key: Vec<Key> = key_columns.iter().map(|column| Key::of(&column[row])).collect();
            flags.push(!seen.insert(key));
        }
        Ok(flags)
    }

    /// Count distinct non-null values in a column.
    pub fn distinct_non_null(&self, name: &str) -> Result<usize> {
        let values = self.require(name)?;
        let distinct: HashSet<Key> = values
            .iter()
            .filter(|value| !value.is_null())
            .map(Key::of)
            .collect();
        Ok(distinct.len())
    }

    pub fn null_count(&self, name: &str) -> Result<usize> {
        let values = self.require(name)?;
        Ok(values.iter().filter(|value| value.is_null()).count())
    }

    /// Names of columns whose realized kind is numeric.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, values)| {
                matches!(column_kind(values), Some(DataKind::Int | DataKind::Float))
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn require(&self, name: &str) -> Result<&[Value]> {
        self.column(name).ok_or_else(|| anyhow!("missing column {}", name))
    }

    fn take_rows(&self, indices: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let taken: Vec<Value> = indices.iter().map(|row| values[*row].clone()).collect();
                (name.clone(), taken)
            })
            .collect();
        Frame {
            columns,
            rows: indices.len(),
        }
    }
}
