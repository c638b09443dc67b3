//! Duplicate-row removal.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::types::{DataSet, Value};

/// Hashable stand-in for a [`Value`]; floats compare by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl From<&Value> for CellKey {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Int64(i) => Self::Int(*i),
            // -0.0 and 0.0 are the same value; every NaN is treated as missing.
            Value::Float64(f) if f.is_nan() => Self::Null,
            Value::Float64(f) => Self::Float(if *f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() }),
            Value::Bool(b) => Self::Bool(*b),
            Value::Utf8(s) => Self::Text(s.clone()),
            Value::DateTime(dt) => Self::DateTime(*dt),
        }
    }
}

/// Drop rows that exactly duplicate an earlier row, keeping the first occurrence.
///
/// Row order of the survivors is unchanged; applying this twice gives the same result as once.
pub fn remove_duplicates(dataset: &DataSet) -> DataSet {
    let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(dataset.row_count());
    dataset.filter_rows(|row| seen.insert(row.iter().map(CellKey::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::remove_duplicates;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn dataset_with_dupes() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
        ]);
        let rows = vec![
            vec![Value::Int64(1), Value::Utf8("a".to_string()), Value::Float64(1.0)],
            vec![Value::Int64(2), Value::Utf8("b".to_string()), Value::Null],
            vec![Value::Int64(1), Value::Utf8("a".to_string()), Value::Float64(1.0)],
            vec![Value::Int64(2), Value::Utf8("b".to_string()), Value::Null],
            vec![Value::Int64(1), Value::Utf8("a ".to_string()), Value::Float64(1.0)],
        ];
        DataSet::new(schema, rows)
    }

    #[test]
    fn keeps_first_occurrence_in_order() {
        let ds = dataset_with_dupes();
        let out = remove_duplicates(&ds);
        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.rows, vec![ds.rows[0].clone(), ds.rows[1].clone(), ds.rows[4].clone()]);
    }

    #[test]
    fn is_idempotent() {
        let once = remove_duplicates(&dataset_with_dupes());
        let twice = remove_duplicates(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn signed_zero_counts_as_duplicate() {
        let schema = Schema::new(vec![Field::new("x", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Float64(0.0)], vec![Value::Float64(-0.0)]]);
        assert_eq!(remove_duplicates(&ds).row_count(), 1);
    }
}
