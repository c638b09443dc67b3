//! Unified load entrypoint.
//!
//! Most callers should use [`load`], which turns an uploaded file (a name plus its bytes) into an
//! in-memory [`crate::types::DataSet`].
//!
//! - The format is picked from the file extension; anything other than `.csv`/`.xlsx` is
//!   rejected with [`SweepError::UnsupportedFormat`].
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{SweepError, SweepResult};
use crate::types::DataSet;

use super::csv;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};

/// Supported file formats, for both load and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FileFormat {
    /// Comma-separated values.
    Csv,
    /// Office Open XML workbook (`.xlsx`).
    Excel,
}

impl FileFormat {
    /// Parse a format from a file extension (case-insensitive, with or without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Pick the format for an uploaded file name.
    pub fn from_file_name(name: &str) -> SweepResult<Self> {
        let ext = extension_of(name);
        Self::from_extension(&ext).ok_or(SweepError::UnsupportedFormat { extension: ext })
    }

    /// Extension (with the dot) written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Excel => ".xlsx",
        }
    }

    /// MIME content type of a download in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Label shown to users (`CSV`, `Excel`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
        }
    }
}

/// Lowercased extension of `name`, including the leading dot (`""` when there is none).
pub(crate) fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// An uploaded file: its name and raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// File name as given by the user; also the dataset's identity within a session.
    pub name: String,
    /// File body.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create an upload from a name and body.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming the upload after the file name component of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> SweepResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Size of the body in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size of the body in KiB, as shown on the file page.
    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Which sheet to read from an Excel workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Read the first sheet (default).
    #[default]
    First,
    /// Read a single named sheet.
    Sheet(String),
}

/// Options controlling load behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// CSV field delimiter.
    pub csv_delimiter: u8,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("csv_delimiter", &(self.csv_delimiter as char))
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            csv_delimiter: b',',
            excel_sheet_selection: ExcelSheetSelection::default(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load an uploaded file into a [`DataSet`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```
/// use data_sweeper::ingestion::{load, LoadOptions, Upload};
/// use data_sweeper::types::Value;
///
/// # fn main() -> Result<(), data_sweeper::SweepError> {
/// let upload = Upload::new("data.csv", "id,value\n1,5\n2,\n");
/// let ds = load(&upload, &LoadOptions::default())?;
/// assert_eq!(ds.row_count(), 2);
/// assert_eq!(ds.rows[1][1], Value::Null);
///
/// let err = load(&Upload::new("notes.txt", "hi"), &LoadOptions::default()).unwrap_err();
/// assert_eq!(err.to_string(), "Unsupported file type: .txt");
/// # Ok(())
/// # }
/// ```
pub fn load(upload: &Upload, options: &LoadOptions) -> SweepResult<DataSet> {
    let format = FileFormat::from_file_name(&upload.name);
    let ctx = LoadContext {
        file_name: upload.name.clone(),
        format: format.as_ref().ok().copied(),
    };

    let result = format.and_then(|fmt| match fmt {
        FileFormat::Csv => csv::load_csv_from_bytes(&upload.bytes, options.csv_delimiter),
        FileFormat::Excel => load_excel_dispatch(&upload.bytes, &options.excel_sheet_selection),
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(
                &ctx,
                LoadStats {
                    rows: ds.row_count(),
                    columns: ds.column_count(),
                },
            ),
            Err(e) => {
                let sev = LoadSeverity::of(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Read `path` from disk and [`load`] it under its file name.
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> SweepResult<DataSet> {
    load(&Upload::from_path(path)?, options)
}

fn load_excel_dispatch(bytes: &[u8], sel: &ExcelSheetSelection) -> SweepResult<DataSet> {
    #[cfg(feature = "excel")]
    {
        super::excel::load_excel_from_bytes(bytes, sel)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (bytes, sel);
        Err(SweepError::Malformed {
            message: "excel support not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{extension_of, FileFormat};

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(extension_of("Report.XLSX"), ".xlsx");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn format_from_file_name() {
        assert_eq!(FileFormat::from_file_name("a.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_file_name("a.Xlsx").unwrap(), FileFormat::Excel);
        let err = FileFormat::from_file_name("a.xls").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: .xls");
    }
}
