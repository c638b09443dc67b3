//! Pipeline configuration.

use crate::ingestion::LoadOptions;
use crate::processing::DEFAULT_IQR_MULTIPLIER;

/// Rows shown in a file's preview unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Options for one session's render passes.
///
/// Use [`Default`] for common cases and struct-update syntax for the rest:
///
/// ```
/// use data_sweeper::config::SweepOptions;
///
/// let opts = SweepOptions {
///     preview_rows: 10,
///     ..Default::default()
/// };
/// assert_eq!(opts.iqr_multiplier, 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// How uploads are parsed (delimiter, sheet, observer).
    pub load: LoadOptions,
    /// Number of rows in each file's preview.
    pub preview_rows: usize,
    /// Fence multiplier for outlier removal.
    pub iqr_multiplier: f64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}
