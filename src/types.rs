//! Core data model types.
//!
//! Every loaded file becomes an in-memory [`DataSet`]: a [`Schema`] (an ordered list of typed
//! [`Field`]s, inferred at load time) plus row-major [`Value`] storage.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Text layout used whenever a datetime is rendered as text (CSV export, text conversion).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Naive (zone-less) date and time.
    DateTime,
}

impl DataType {
    /// `true` for the types the cleaning operations treat as numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// `true` for string columns.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Utf8)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Utf8 => "utf8",
            Self::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Indexes of all numeric fields, in schema order.
    pub fn numeric_indices(&self) -> Vec<usize> {
        self.indices_where(|t| t.is_numeric())
    }

    /// Indexes of all text fields, in schema order.
    pub fn text_indices(&self) -> Vec<usize> {
        self.indices_where(|t| t.is_text())
    }

    fn indices_where(&self, pred: impl Fn(DataType) -> bool) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| pred(f.data_type))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Naive date and time.
    DateTime(NaiveDateTime),
}

impl Value {
    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `true` for [`Value::Null`] and for a `NaN` float.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float64(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value. Only `Int64` and `Float64` have one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Text rendering of a non-null value; `None` for [`Value::Null`].
    ///
    /// Integral floats keep a trailing `.0` so they stay distinguishable from integers.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Int64(v) => Some(v.to_string()),
            Self::Float64(v) => Some(format_float(*v)),
            Self::Bool(b) => Some(if *b { "True" } else { "False" }.to_owned()),
            Self::Utf8(s) => Some(s.clone()),
            Self::DateTime(dt) => Some(dt.format(DATETIME_FORMAT).to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(s) => f.write_str(&s),
            None => f.write_str("None"),
        }
    }
}

fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_owned()
    } else if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(&Value::Null))
    }

    /// Non-missing numeric values of one column, in row order. `NaN` counts as missing.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.column(idx)
            .filter_map(Value::as_f64)
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// The first `n` rows (fewer if the dataset is shorter).
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The returned dataset preserves the original schema.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }
}

/// Mutable cell `idx` of `row`, padding a short row with missing values first.
pub(crate) fn cell_mut(row: &mut Vec<Value>, idx: usize) -> &mut Value {
    if row.len() <= idx {
        row.resize(idx + 1, Value::Null);
    }
    &mut row[idx]
}

#[cfg(test)]
mod tests {
    use super::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
        ]);
        let rows = vec![
            vec![Value::Int64(1), Value::Utf8("a".to_string()), Value::Float64(1.5)],
            vec![Value::Int64(2), Value::Utf8("b".to_string()), Value::Null],
            vec![Value::Int64(3), Value::Null, Value::Float64(4.0)],
        ];
        DataSet::new(schema, rows)
    }

    #[test]
    fn schema_index_of_works() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.index_of("id"), Some(0));
        assert_eq!(ds.schema.index_of("score"), Some(2));
        assert_eq!(ds.schema.index_of("missing"), None);
    }

    #[test]
    fn numeric_and_text_indices_follow_schema_order() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.numeric_indices(), vec![0, 2]);
        assert_eq!(ds.schema.text_indices(), vec![1]);
    }

    #[test]
    fn numeric_values_skip_nulls() {
        let ds = sample_dataset();
        assert_eq!(ds.numeric_values(2), vec![1.5, 4.0]);
        assert_eq!(ds.numeric_values(0), vec![1.0, 2.0, 3.0]);
        assert!(ds.numeric_values(1).is_empty());
    }

    #[test]
    fn head_truncates_without_touching_schema() {
        let ds = sample_dataset();
        let head = ds.head(2);
        assert_eq!(head.schema, ds.schema);
        assert_eq!(head.row_count(), 2);
        assert_eq!(ds.head(10).row_count(), 3);
    }

    #[test]
    fn to_text_keeps_float_marker() {
        assert_eq!(Value::Float64(3.0).to_text().as_deref(), Some("3.0"));
        assert_eq!(Value::Float64(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(Value::Int64(3).to_text().as_deref(), Some("3"));
        assert_eq!(Value::Bool(true).to_text().as_deref(), Some("True"));
        assert_eq!(Value::Null.to_text(), None);
    }

    #[test]
    #[should_panic(expected = "mapped row length")]
    fn map_rows_panics_if_mapper_returns_wrong_arity() {
        let ds = sample_dataset();
        let _ = ds.map_rows(|_row| vec![Value::Int64(1)]);
    }
}
