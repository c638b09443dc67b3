//! Serialize a [`DataSet`] back to CSV or Excel for download.

use serde::Serialize;

use crate::error::SweepResult;
use crate::ingestion::FileFormat;
use crate::types::{DataSet, Value};

/// A file ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Download {
    /// Output name: the original name with its extension swapped for the target's.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Encoded file body.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Encode `dataset` as `format`, naming the result after `original_name`.
///
/// Headers are always written (so an empty dataset still yields a valid file), no index column
/// is added, and missing values become empty cells.
pub fn export(dataset: &DataSet, original_name: &str, format: FileFormat) -> SweepResult<Download> {
    let bytes = match format {
        FileFormat::Csv => to_csv_bytes(dataset)?,
        FileFormat::Excel => to_xlsx_bytes(dataset)?,
    };
    log::info!(
        "export: {original_name} -> {} ({} rows, {} bytes)",
        format.label(),
        dataset.row_count(),
        bytes.len()
    );
    Ok(Download {
        file_name: output_file_name(original_name, format),
        content_type: format.content_type(),
        bytes,
    })
}

/// Swap the extension of `original_name` for the one `format` writes.
///
/// Only the last path component is kept. A name without an extension (or a dotfile such as
/// `.data`) just gets the new one appended.
pub fn output_file_name(original_name: &str, format: FileFormat) -> String {
    let trimmed = original_name.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };
    format!("{stem}{}", format.extension())
}

/// Encode as comma-separated text with a header row.
pub fn to_csv_bytes(dataset: &DataSet) -> SweepResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_text().unwrap_or_default()))?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// Encode as an `.xlsx` workbook with a single sheet.
#[cfg(feature = "excel")]
pub fn to_xlsx_bytes(dataset: &DataSet) -> SweepResult<Vec<u8>> {
    use rust_xlsxwriter::{Format, Workbook};

    use crate::error::SweepError;

    let too_large = |what: &str| SweepError::Malformed {
        message: format!("dataset has too many {what} for an Excel sheet"),
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;
    let header = Format::new().set_bold();
    let datetime = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (c, name) in dataset.schema.field_names().enumerate() {
        let col = u16::try_from(c).map_err(|_| too_large("columns"))?;
        sheet.write_string_with_format(0, col, name, &header)?;
    }

    for (r, row) in dataset.rows.iter().enumerate() {
        let out_row = u32::try_from(r + 1).map_err(|_| too_large("rows"))?;
        for (c, value) in row.iter().enumerate() {
            let col = u16::try_from(c).map_err(|_| too_large("columns"))?;
            match value {
                Value::Null => {}
                Value::Int64(i) => {
                    sheet.write_number(out_row, col, *i as f64)?;
                }
                Value::Float64(f) if f.is_finite() => {
                    sheet.write_number(out_row, col, *f)?;
                }
                Value::Float64(_) => {}
                Value::Bool(b) => {
                    sheet.write_boolean(out_row, col, *b)?;
                }
                Value::Utf8(s) => {
                    sheet.write_string(out_row, col, s)?;
                }
                Value::DateTime(dt) => {
                    sheet.write_datetime_with_format(out_row, col, dt, &datetime)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(not(feature = "excel"))]
pub fn to_xlsx_bytes(_dataset: &DataSet) -> SweepResult<Vec<u8>> {
    Err(crate::error::SweepError::Malformed {
        message: "excel support not enabled (enable cargo feature 'excel')".to_string(),
    })
}
