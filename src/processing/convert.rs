//! Best-effort column type conversion.
//!
//! A conversion never fails because of a single bad value: values that cannot be coerced become
//! [`Value::Null`] and are listed in the returned [`ConversionReport`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{SweepError, SweepResult};
use crate::types::{cell_mut, DataSet, DataType, Value};

/// Type a column can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionTarget {
    /// Text (`Utf8`).
    Text,
    /// Number (`Int64` when lossless, else `Float64`).
    Number,
    /// Date and time.
    DateTime,
}

impl fmt::Display for ConversionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "string",
            Self::Number => "number",
            Self::DateTime => "datetime",
        })
    }
}

impl FromStr for ConversionTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" | "str" => Ok(Self::Text),
            "number" | "numeric" => Ok(Self::Number),
            "datetime" | "date" => Ok(Self::DateTime),
            other => Err(format!("unknown conversion target '{other}' (expected string, number or datetime)")),
        }
    }
}

/// A single value that could not be coerced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueFailure {
    /// 0-based row position in the dataset.
    pub row: usize,
    /// The value as text before conversion.
    pub raw: String,
    /// Why it could not be converted.
    pub message: String,
}

/// Outcome of [`convert_column_type`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Converted column.
    pub column: String,
    /// Requested target.
    pub target: ConversionTarget,
    /// Resulting column type.
    pub data_type: DataType,
    /// Values that became missing.
    pub failures: Vec<ValueFailure>,
}

impl ConversionReport {
    /// `true` if every non-missing value converted.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Coerce `column` to `target`.
///
/// Missing values stay missing. Returns the new dataset plus a report of the values that could
/// not be converted; only an unknown column is an error ([`SweepError::ConversionFailure`]).
pub fn convert_column_type(
    dataset: &DataSet,
    column: &str,
    target: ConversionTarget,
) -> SweepResult<(DataSet, ConversionReport)> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| SweepError::ConversionFailure {
            column: column.to_owned(),
            message: "column not found".to_string(),
        })?;

    let mut failures = Vec::new();
    let mut converted: Vec<Value> = Vec::with_capacity(dataset.row_count());
    for (row, value) in dataset.column(idx).enumerate() {
        let result = match target {
            ConversionTarget::Text => Ok(to_text(value)),
            ConversionTarget::Number => to_number(value),
            ConversionTarget::DateTime => to_datetime(value),
        };
        match result {
            Ok(v) => converted.push(v),
            Err(message) => {
                failures.push(ValueFailure {
                    row,
                    raw: value.to_string(),
                    message,
                });
                converted.push(Value::Null);
            }
        }
    }

    let data_type = match target {
        ConversionTarget::Text => DataType::Utf8,
        ConversionTarget::DateTime => DataType::DateTime,
        ConversionTarget::Number => {
            let all_int = converted.iter().all(|v| matches!(v, Value::Int64(_)));
            if all_int {
                DataType::Int64
            } else {
                for v in &mut converted {
                    if let Value::Int64(i) = v {
                        *v = Value::Float64(*i as f64);
                    }
                }
                DataType::Float64
            }
        }
    };

    let mut out = dataset.clone();
    out.schema.fields[idx].data_type = data_type;
    for (row, value) in out.rows.iter_mut().zip(converted) {
        *cell_mut(row, idx) = value;
    }

    log::debug!(
        "convert: column '{column}' -> {target} ({data_type}), {} value(s) coerced to missing",
        failures.len()
    );
    Ok((
        out,
        ConversionReport {
            column: column.to_owned(),
            target,
            data_type,
            failures,
        },
    ))
}

fn to_text(value: &Value) -> Value {
    value.to_text().map_or(Value::Null, Value::Utf8)
}

fn to_number(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Int64(i) => Ok(Value::Int64(*i)),
        Value::Float64(f) if f.is_nan() => Ok(Value::Null),
        Value::Float64(f) => Ok(Value::Float64(*f)),
        Value::Bool(b) => Ok(Value::Int64(i64::from(*b))),
        Value::DateTime(dt) => dt
            .and_utc()
            .timestamp_nanos_opt()
            .map(Value::Int64)
            .ok_or_else(|| format!("datetime {dt} is out of range for nanoseconds")),
        Value::Utf8(s) => parse_number(s),
    }
}

fn parse_number(s: &str) -> Result<Value, String> {
    let t = s.trim();
    if t.is_empty() {
        return Ok(Value::Null);
    }
    if let Ok(i) = t.parse::<i64>() {
        return Ok(Value::Int64(i));
    }
    match t.parse::<f64>() {
        Ok(f) if f.is_nan() => Ok(Value::Null),
        Ok(f) => Ok(Value::Float64(f)),
        Err(_) => Err(format!("Unable to parse string \"{s}\"")),
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

fn to_datetime(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
        Value::Int64(i) => Ok(Value::DateTime(DateTime::from_timestamp_nanos(*i).naive_utc())),
        Value::Float64(f) if f.is_nan() => Ok(Value::Null),
        Value::Float64(f) if f.is_finite() && f.abs() < i64::MAX as f64 => {
            Ok(Value::DateTime(DateTime::from_timestamp_nanos(*f as i64).naive_utc()))
        }
        Value::Float64(f) => Err(format!("{f} is out of range for a datetime")),
        Value::Bool(b) => Err(format!("{b} is not a valid datetime")),
        Value::Utf8(s) => parse_datetime(s)
            .map(Value::DateTime)
            .ok_or_else(|| format!("Unknown datetime string format, unable to parse: {s}")),
    }
}

/// Parse the datetime spellings accepted by [`ConversionTarget::DateTime`].
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let t = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(t, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(t, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
