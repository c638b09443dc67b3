use thiserror::Error;

/// Convenience result type used across the crate.
pub type SweepResult<T> = Result<T, SweepError>;

/// Error type returned by load, cleaning, conversion, chart and export functions.
///
/// Only the parse/serialize variants mean a file could not be processed at all; the others are
/// reported against a single file or column and the pipeline keeps going.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Excel read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[cfg(feature = "excel")]
    /// Excel write error (feature-gated behind `excel`).
    #[error("xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The file extension is not one of the supported formats.
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    /// The input parsed but does not describe a usable table (no header row, empty workbook...).
    #[error("malformed input: {message}")]
    Malformed { message: String },

    /// A column could not be converted as a whole.
    #[error("Error converting {column}: {message}")]
    ConversionFailure { column: String, message: String },

    /// Visualization needs at least two numeric columns.
    #[error("Visualization requires at least 2 numeric columns (found {found}).")]
    InsufficientColumns { found: usize },

    /// A requested column is not part of the dataset.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// The same column was requested more than once.
    #[error("column '{column}' selected more than once")]
    DuplicateColumn { column: String },

    /// An action targeted a file the session does not hold.
    #[error("no file named '{name}' in this session")]
    UnknownFile { name: String },
}
