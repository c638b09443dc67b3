//! CSV load implementation.
//!
//! Column types are inferred from the data rather than supplied by the caller: a column is
//! `Int64` if every non-missing cell parses as an integer, otherwise `Float64` if every cell parses
//! as a number, otherwise `Bool` if every cell is `true`/`false`, otherwise `Utf8`.

use std::io::Read;
use std::path::Path;

use crate::error::{SweepError, SweepResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::unique_headers;

/// Cell spellings read as missing values.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Load a CSV file from disk into an in-memory [`DataSet`].
pub fn load_csv_from_path(path: impl AsRef<Path>, delimiter: u8) -> SweepResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an in-memory buffer (an uploaded file body).
pub fn load_csv_from_bytes(bytes: &[u8], delimiter: u8) -> SweepResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
///
/// Rules:
///
/// - The first record is the header row; a file without one is rejected.
/// - Duplicate or blank header names are made unique.
/// - Short rows are padded with missing values; cells beyond the header width are dropped.
pub fn load_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> SweepResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(SweepError::Malformed {
            message: "no columns to parse from file".to_string(),
        });
    }
    let names = unique_headers(headers.iter().map(str::to_owned));

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
        row.resize(names.len(), String::new());
        raw_rows.push(row);
    }

    let mut fields = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let data_type = infer_column_type(raw_rows.iter().map(|r| r[idx].as_str()), !raw_rows.is_empty());
        fields.push(Field::new(name, data_type));
    }

    let rows = raw_rows
        .iter()
        .map(|raw| {
            fields
                .iter()
                .zip(raw)
                .map(|(field, cell)| typed_value(field.data_type, cell))
                .collect()
        })
        .collect();

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn is_missing(raw: &str) -> bool {
    NA_VALUES.contains(&raw)
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>, has_rows: bool) -> DataType {
    let mut seen = false;
    let (mut int, mut float, mut boolean) = (true, true, true);

    for raw in cells.filter(|c| !is_missing(c)) {
        seen = true;
        let trimmed = raw.trim();
        int = int && trimmed.parse::<i64>().is_ok();
        float = float && trimmed.parse::<f64>().is_ok();
        boolean = boolean && parse_bool(trimmed).is_some();
        if !(int || float || boolean) {
            return DataType::Utf8;
        }
    }

    match (seen, int, float, boolean) {
        (false, ..) if has_rows => DataType::Float64,
        (false, ..) => DataType::Utf8,
        (true, true, _, _) => DataType::Int64,
        (true, _, true, _) => DataType::Float64,
        (true, _, _, true) => DataType::Bool,
        _ => DataType::Utf8,
    }
}

fn typed_value(data_type: DataType, raw: &str) -> Value {
    if is_missing(raw) {
        return Value::Null;
    }
    let trimmed = raw.trim();
    // Inference guarantees these parses succeed; fall back to missing rather than panic.
    match data_type {
        DataType::Int64 => trimmed.parse().map(Value::Int64).unwrap_or(Value::Null),
        DataType::Float64 => trimmed.parse().map(Value::Float64).unwrap_or(Value::Null),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).unwrap_or(Value::Null),
        DataType::Utf8 | DataType::DateTime => Value::Utf8(raw.to_owned()),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::infer_column_type;
    use crate::types::DataType;

    #[test]
    fn infers_narrowest_type() {
        assert_eq!(infer_column_type(["1", "2", ""].into_iter(), true), DataType::Int64);
        assert_eq!(infer_column_type(["1", "2.5"].into_iter(), true), DataType::Float64);
        assert_eq!(infer_column_type(["True", "false"].into_iter(), true), DataType::Bool);
        assert_eq!(infer_column_type(["1", "x"].into_iter(), true), DataType::Utf8);
    }

    #[test]
    fn all_missing_column_is_float_when_rows_exist() {
        assert_eq!(infer_column_type(["", "NaN"].into_iter(), true), DataType::Float64);
        assert_eq!(infer_column_type(std::iter::empty(), false), DataType::Utf8);
    }

    #[test]
    fn whitespace_only_cell_forces_text() {
        assert_eq!(infer_column_type([" 1 ", "  "].into_iter(), true), DataType::Utf8);
        assert_eq!(infer_column_type([" 1 ", "2"].into_iter(), true), DataType::Int64);
    }
}
