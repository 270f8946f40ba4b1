//! Column Implementation
//!
//! A Column is an array-like random-access data container indexed by row.
//! Each Column has a type specifying the type of every value stored, and
//! every cell may be absent (loaded tables are always nullable).
//!
//! # String Interning
//!
//! String columns store `StringId`s issued by the owning table's
//! `StringInterner`, so reading a string cell needs the interner to resolve
//! the ID back to text.

use crate::error::{ListingError, Result};
use crate::interner::{StringId, StringInterner};
use serde::{Serialize, Serializer};
use std::fmt::Debug;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Bool,
    /// Days since 1970-01-01
    Date,
}

impl ColumnType {
    /// Int64 and Float64 columns can be summarized numerically.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int64 | ColumnType::Float64)
    }

    /// String columns hold categorical values.
    pub fn is_categorical(self) -> bool {
        self == ColumnType::String
    }
}

/// Column value enum to support multiple types
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Int64(i64),
    Float64(f64),
    String(String),
    Bool(bool),
    Date(i32),
    Null,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ColumnValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ColumnValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Type of a non-null value
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            ColumnValue::Int64(_) => Some(ColumnType::Int64),
            ColumnValue::Float64(_) => Some(ColumnType::Float64),
            ColumnValue::String(_) => Some(ColumnType::String),
            ColumnValue::Bool(_) => Some(ColumnType::Bool),
            ColumnValue::Date(_) => Some(ColumnType::Date),
            ColumnValue::Null => None,
        }
    }
}

impl Serialize for ColumnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ColumnValue::Int64(v) => serializer.serialize_i64(*v),
            ColumnValue::Float64(v) => serializer.serialize_f64(*v),
            ColumnValue::String(v) => serializer.serialize_str(v),
            ColumnValue::Bool(v) => serializer.serialize_bool(*v),
            ColumnValue::Date(days) => serializer.serialize_str(&crate::table::format_date(*days)),
            ColumnValue::Null => serializer.serialize_none(),
        }
    }
}

/// Typed cell storage; `None` marks an absent cell.
#[derive(Clone)]
enum ColumnData {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    String(Vec<Option<StringId>>),
    Bool(Vec<Option<bool>>),
    Date(Vec<Option<i32>>),
}

impl ColumnData {
    fn with_capacity(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Int64 => ColumnData::Int64(Vec::with_capacity(capacity)),
            ColumnType::Float64 => ColumnData::Float64(Vec::with_capacity(capacity)),
            ColumnType::String => ColumnData::String(Vec::with_capacity(capacity)),
            ColumnType::Bool => ColumnData::Bool(Vec::with_capacity(capacity)),
            ColumnType::Date => ColumnData::Date(Vec::with_capacity(capacity)),
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::String(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Date(v) => v.len(),
        }
    }
}

/// A named, typed, nullable column.
#[derive(Clone)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    data: ColumnData,
}

impl Column {
    pub fn new(name: String, column_type: ColumnType) -> Self {
        Self::with_capacity(name, column_type, 0)
    }

    pub fn with_capacity(name: String, column_type: ColumnType, capacity: usize) -> Self {
        Column {
            name,
            column_type,
            data: ColumnData::with_capacity(column_type, capacity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Append a value, interning strings. NaN floats are stored as absent.
    pub fn append(&mut self, value: ColumnValue, interner: &mut StringInterner) -> Result<()> {
        match (&mut self.data, value) {
            (ColumnData::Int64(v), ColumnValue::Null) => v.push(None),
            (ColumnData::Float64(v), ColumnValue::Null) => v.push(None),
            (ColumnData::String(v), ColumnValue::Null) => v.push(None),
            (ColumnData::Bool(v), ColumnValue::Null) => v.push(None),
            (ColumnData::Date(v), ColumnValue::Null) => v.push(None),
            (ColumnData::Int64(v), ColumnValue::Int64(n)) => v.push(Some(n)),
            (ColumnData::Float64(v), ColumnValue::Float64(f)) => {
                v.push(if f.is_nan() { None } else { Some(f) })
            }
            (ColumnData::Float64(v), ColumnValue::Int64(n)) => v.push(Some(n as f64)),
            (ColumnData::String(v), ColumnValue::String(s)) => v.push(Some(interner.intern(&s))),
            (ColumnData::Bool(v), ColumnValue::Bool(b)) => v.push(Some(b)),
            (ColumnData::Date(v), ColumnValue::Date(d)) => v.push(Some(d)),
            (_, other) => {
                return Err(ListingError::FieldType {
                    field: self.name.clone(),
                    expected: type_label(self.column_type),
                    actual: other.column_type().unwrap_or(self.column_type),
                })
            }
        }
        Ok(())
    }

    /// Read a cell as an owned value; `None` when the index is out of range.
    pub fn get(&self, index: usize, interner: &StringInterner) -> Option<ColumnValue> {
        let value = match &self.data {
            ColumnData::Int64(v) => v.get(index)?.map(ColumnValue::Int64),
            ColumnData::Float64(v) => v.get(index)?.map(ColumnValue::Float64),
            ColumnData::String(v) => v
                .get(index)?
                .and_then(|id| interner.resolve(id))
                .map(|s| ColumnValue::String(s.to_string())),
            ColumnData::Bool(v) => v.get(index)?.map(ColumnValue::Bool),
            ColumnData::Date(v) => v.get(index)?.map(ColumnValue::Date),
        };
        Some(value.unwrap_or(ColumnValue::Null))
    }

    /// Fast numeric access without building a ColumnValue.
    /// Returns None if the value is absent, not numeric, or out of bounds.
    #[inline]
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Int64(v) => v.get(index).copied().flatten().map(|n| n as f64),
            ColumnData::Float64(v) => v.get(index).copied().flatten(),
            _ => None,
        }
    }

    /// Interned ID of a string cell.
    #[inline]
    pub fn string_id(&self, index: usize) -> Option<StringId> {
        match &self.data {
            ColumnData::String(v) => v.get(index).copied().flatten(),
            _ => None,
        }
    }

    /// Resolve a string cell through the owning table's interner.
    #[inline]
    pub fn get_str<'a>(&self, index: usize, interner: &'a StringInterner) -> Option<&'a str> {
        self.string_id(index).and_then(|id| interner.resolve(id))
    }

    /// Check if a value at index is absent (out of range counts as absent).
    #[inline]
    pub fn is_null_at(&self, index: usize) -> bool {
        match &self.data {
            ColumnData::Int64(v) => v.get(index).map_or(true, Option::is_none),
            ColumnData::Float64(v) => v.get(index).map_or(true, Option::is_none),
            ColumnData::String(v) => v.get(index).map_or(true, Option::is_none),
            ColumnData::Bool(v) => v.get(index).map_or(true, Option::is_none),
            ColumnData::Date(v) => v.get(index).map_or(true, Option::is_none),
        }
    }

    /// Number of present cells
    pub fn count_non_null(&self) -> usize {
        (0..self.len()).filter(|&i| !self.is_null_at(i)).count()
    }

    /// Build a new column holding the given rows, in the given order.
    /// String IDs are copied as-is, so the result shares the interner.
    pub fn take(&self, indices: &[usize]) -> Column {
        fn pick<T: Copy>(values: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
            indices
                .iter()
                .map(|&i| values.get(i).copied().flatten())
                .collect()
        }

        let data = match &self.data {
            ColumnData::Int64(v) => ColumnData::Int64(pick(v, indices)),
            ColumnData::Float64(v) => ColumnData::Float64(pick(v, indices)),
            ColumnData::String(v) => ColumnData::String(pick(v, indices)),
            ColumnData::Bool(v) => ColumnData::Bool(pick(v, indices)),
            ColumnData::Date(v) => ColumnData::Date(pick(v, indices)),
        };

        Column {
            name: self.name.clone(),
            column_type: self.column_type,
            data,
        }
    }
}

pub(crate) fn type_label(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Int64 => "int64",
        ColumnType::Float64 => "float64",
        ColumnType::String => "string",
        ColumnType::Bool => "bool",
        ColumnType::Date => "date",
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(type_label(*self))
    }
}

impl Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column {{ name: '{}', type: {:?}, len: {} }}",
            self.name,
            self.column_type,
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_basic() {
        let mut interner = StringInterner::new();
        let mut col = Column::new("bed".to_string(), ColumnType::Int64);
        col.append(ColumnValue::Int64(3), &mut interner).unwrap();
        col.append(ColumnValue::Int64(4), &mut interner).unwrap();

        assert_eq!(col.len(), 2);
        assert_eq!(col.get(0, &interner).unwrap().as_i64(), Some(3));
        assert_eq!(col.get_f64(1), Some(4.0));
        assert!(col.get(2, &interner).is_none());
    }

    #[test]
    fn test_column_nullable() {
        let mut interner = StringInterner::new();
        let mut col = Column::new("price".to_string(), ColumnType::Float64);
        col.append(ColumnValue::Float64(105000.0), &mut interner).unwrap();
        col.append(ColumnValue::Null, &mut interner).unwrap();
        col.append(ColumnValue::Float64(f64::NAN), &mut interner).unwrap();

        assert_eq!(col.len(), 3);
        assert!(!col.is_null_at(0));
        assert!(col.get(1, &interner).unwrap().is_null());
        assert!(col.is_null_at(2));
        assert_eq!(col.get_f64(2), None);
        assert_eq!(col.count_non_null(), 1);
    }

    #[test]
    fn test_column_rejects_mismatched_type() {
        let mut interner = StringInterner::new();
        let mut col = Column::new("price".to_string(), ColumnType::Float64);
        let err = col
            .append(ColumnValue::String("cheap".to_string()), &mut interner)
            .unwrap_err();
        assert!(matches!(err, ListingError::FieldType { .. }));

        // integers widen into float columns
        col.append(ColumnValue::Int64(7), &mut interner).unwrap();
        assert_eq!(col.get_f64(0), Some(7.0));
    }

    #[test]
    fn test_column_string_interning() {
        let mut interner = StringInterner::new();
        let mut col = Column::new("state".to_string(), ColumnType::String);

        for s in ["Ohio", "Iowa", "Ohio", "Ohio"] {
            col.append(ColumnValue::String(s.to_string()), &mut interner)
                .unwrap();
        }

        assert_eq!(col.get_str(0, &interner), Some("Ohio"));
        assert_eq!(col.get_str(1, &interner), Some("Iowa"));
        assert_eq!(col.string_id(0), col.string_id(3));
        assert_eq!(interner.len(), 2);
        assert_eq!(col.get_f64(0), None);
    }

    #[test]
    fn test_column_take() {
        let mut interner = StringInterner::new();
        let mut col = Column::new("city".to_string(), ColumnType::String);
        for s in ["Adjuntas", "Ponce", "Mayaguez"] {
            col.append(ColumnValue::String(s.to_string()), &mut interner)
                .unwrap();
        }

        let subset = col.take(&[2, 0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.get_str(0, &interner), Some("Mayaguez"));
        assert_eq!(subset.get_str(1, &interner), Some("Adjuntas"));
    }
}
