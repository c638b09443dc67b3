#![cfg(feature = "excel")]

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{SweepError, SweepResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::unified::ExcelSheetSelection;
use super::unique_headers;

/// Load an `.xlsx` workbook from disk into an in-memory [`DataSet`].
pub fn load_excel_from_path(path: impl AsRef<Path>, sheet: &ExcelSheetSelection) -> SweepResult<DataSet> {
    let bytes = std::fs::read(path)?;
    load_excel_from_bytes(&bytes, sheet)
}

/// Load an `.xlsx` workbook held in memory (an uploaded file body).
///
/// Behavior:
/// - Picks the named sheet if one is selected; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Infers one [`DataType`] per column from the cell kinds below the header
pub fn load_excel_from_bytes(bytes: &[u8], sheet: &ExcelSheetSelection) -> SweepResult<DataSet> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(calamine::Error::Xlsx)?;

    let sheet_name = match sheet {
        ExcelSheetSelection::Sheet(name) => name.clone(),
        ExcelSheetSelection::First => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SweepError::Malformed {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(calamine::Error::Xlsx)?;
    dataset_from_range(&sheet_name, &range)
}

fn dataset_from_range(sheet: &str, range: &Range<Data>) -> SweepResult<DataSet> {
    let mut rows = range.rows().skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let header = rows.next().ok_or_else(|| SweepError::Malformed {
        message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
    })?;
    let names = unique_headers(header.iter().map(cell_to_header_string));
    let body: Vec<&[Data]> = rows.collect();

    let mut fields = Vec::with_capacity(names.len());
    let mut columns: Vec<Vec<Value>> = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(idx).unwrap_or(&Data::Empty))
            .collect();
        let (data_type, values) = convert_column(&cells);
        fields.push(Field::new(name, data_type));
        columns.push(values);
    }

    let rows = (0..body.len())
        .map(|r| columns.iter().map(|col| col[r].clone()).collect())
        .collect();
    Ok(DataSet::new(Schema::new(fields), rows))
}

/// Cell kinds that decide a column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Bool,
    DateTime,
    Text,
}

fn cell_kind(c: &Data) -> Option<CellKind> {
    match c {
        Data::Empty | Data::Error(_) => None,
        Data::Int(_) => Some(CellKind::Int),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(CellKind::Int),
        Data::Float(_) => Some(CellKind::Float),
        Data::Bool(_) => Some(CellKind::Bool),
        Data::DateTime(_) => Some(CellKind::DateTime),
        Data::DateTimeIso(s) if parse_iso_datetime(s).is_some() => Some(CellKind::DateTime),
        Data::String(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => Some(CellKind::Text),
    }
}

fn convert_column(cells: &[&Data]) -> (DataType, Vec<Value>) {
    let kinds: Vec<CellKind> = cells.iter().filter_map(|c| cell_kind(c)).collect();

    let data_type = match kinds.first() {
        None if cells.is_empty() => DataType::Utf8,
        None => DataType::Float64,
        Some(first) => {
            let numeric = |k: &CellKind| matches!(k, CellKind::Int | CellKind::Float);
            if kinds.iter().all(|k| *k == CellKind::Int) {
                DataType::Int64
            } else if kinds.iter().all(numeric) {
                DataType::Float64
            } else if kinds.iter().all(|k| k == first) {
                match first {
                    CellKind::Bool => DataType::Bool,
                    CellKind::DateTime => DataType::DateTime,
                    _ => DataType::Utf8,
                }
            } else {
                DataType::Utf8
            }
        }
    };

    let values = cells.iter().map(|c| convert_cell(data_type, c)).collect();
    (data_type, values)
}

fn convert_cell(data_type: DataType, c: &Data) -> Value {
    if cell_kind(c).is_none() {
        return Value::Null;
    }
    match (data_type, c) {
        (DataType::Int64, Data::Int(i)) => Value::Int64(*i),
        (DataType::Int64, Data::Float(f)) => Value::Int64(*f as i64),
        (DataType::Float64, Data::Int(i)) => Value::Float64(*i as f64),
        (DataType::Float64, Data::Float(f)) => Value::Float64(*f),
        (DataType::Bool, Data::Bool(b)) => Value::Bool(*b),
        (DataType::DateTime, Data::DateTime(dt)) => {
            excel_serial_to_datetime(dt.as_f64()).map_or(Value::Null, Value::DateTime)
        }
        (DataType::DateTime, Data::DateTimeIso(s)) => parse_iso_datetime(s).map_or(Value::Null, Value::DateTime),
        _ => Value::Utf8(cell_to_string(c)),
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => cell_to_string(other),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(|d| d.format(crate::types::DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| dt.to_string()),
        Data::Bool(b) => Value::Bool(*b).to_string(),
        Data::Float(f) => Value::Float64(*f).to_string(),
        other => other.to_string(),
    }
}

/// Convert an Excel serial date (days since 1899-12-30, 1900 date system) to a datetime.
pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::milliseconds(millis as i64))
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
}
