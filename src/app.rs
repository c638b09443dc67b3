//! The page model and the reactive render step.
//!
//! A front end keeps one [`Session`] per user and, whenever an upload changes or a control fires,
//! calls [`render`] with the current uploads and the [`Action`] (if any). The returned [`Page`]
//! holds everything to show: per-file preview, profile, notices, chart and download.
//!
//! ```
//! use data_sweeper::app::{render, Action, NoticeLevel, Operation};
//! use data_sweeper::config::SweepOptions;
//! use data_sweeper::ingestion::Upload;
//! use data_sweeper::session::Session;
//!
//! let uploads = vec![Upload::new("data.csv", "id,value\n1,5\n2,\n3,1000\n")];
//! let opts = SweepOptions::default();
//! let mut session = Session::new();
//!
//! let fill = Action::new("data.csv", Operation::FillMissing);
//! let page = render(&mut session, &uploads, Some(&fill), &opts);
//! assert_eq!(page.files[0].notices[0].level, NoticeLevel::Success);
//!
//! // The filled dataset persists into the next render.
//! let page = render(&mut session, &uploads, None, &opts);
//! assert_eq!(page.files[0].preview.rows[1][1].to_string(), "502.5");
//! ```

use std::fmt;

use serde::Serialize;

use crate::chart::{bar_chart, BarChart};
use crate::config::SweepOptions;
use crate::error::{SweepError, SweepResult};
use crate::export::{export, Download};
use crate::ingestion::{FileFormat, Upload};
use crate::processing::{
    convert_column_type, fill_missing, remove_duplicates, remove_outliers_with, select_columns,
    trim_strings, ConversionReport, ConversionTarget,
};
use crate::profile::{describe, Profile};
use crate::session::Session;
use crate::types::{DataSet, DataType};

/// Closing notice appended when at least one upload was rendered.
pub const ALL_PROCESSED: &str = "All files processed!";

/// What a control does to its file.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Drop repeated rows, keeping the first.
    RemoveDuplicates,
    /// Drop rows outside the IQR fences of any numeric column.
    RemoveOutliers,
    /// Fill numeric gaps with the column mean.
    FillMissing,
    /// Strip surrounding whitespace in text columns.
    TrimStrings,
    /// Keep exactly these columns, in this order.
    SelectColumns(Vec<String>),
    /// Coerce one column; unparseable values become missing.
    ConvertColumn {
        /// Column to convert.
        column: String,
        /// Requested type.
        target: ConversionTarget,
    },
    /// Chart the first two numeric columns. Leaves the dataset untouched.
    Visualize,
    /// Produce a download. Leaves the dataset untouched.
    Export(FileFormat),
}

impl Operation {
    /// Stable key of the control that triggers this operation on `file`.
    pub fn control_key(&self, file: &str) -> ControlKey {
        match self {
            Self::RemoveDuplicates => ControlKey::new("dup", file, None),
            Self::RemoveOutliers => ControlKey::new("outliers", file, None),
            Self::FillMissing => ControlKey::new("fill", file, None),
            Self::TrimStrings => ControlKey::new("trim", file, None),
            Self::SelectColumns(_) => ControlKey::new("cols", file, None),
            Self::ConvertColumn { column, .. } => ControlKey::new("dtype", file, Some(column)),
            Self::Visualize => ControlKey::new("viz", file, None),
            Self::Export(_) => ControlKey::new("conv", file, None),
        }
    }
}

/// An operation aimed at one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Name of the upload the action applies to.
    pub file: String,
    /// What to do to it.
    pub operation: Operation,
}

impl Action {
    /// Aim `operation` at the upload named `file`.
    pub fn new(file: impl Into<String>, operation: Operation) -> Self {
        Self {
            file: file.into(),
            operation,
        }
    }

    /// Key of the control that fired this action.
    pub fn control_key(&self) -> ControlKey {
        self.operation.control_key(&self.file)
    }
}

/// Identity of one control on the page.
///
/// Built from the control kind, the file name and (for per-column controls) the column name, so
/// two files with the same column names never share state. The file name is length-prefixed
/// (`dtype:5:a.csv:id`), so no choice of file and column names can make two keys equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ControlKey(String);

impl ControlKey {
    fn new(kind: &str, file: &str, column: Option<&str>) -> Self {
        let len = file.len();
        match column {
            Some(column) => Self(format!("{kind}:{len}:{file}:{column}")),
            None => Self(format!("{kind}:{len}:{file}")),
        }
    }

    /// The key as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a notice is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// The step completed.
    Success,
    /// Neutral information.
    Info,
    /// The step completed with caveats, or was skipped harmlessly.
    Warning,
    /// The step failed.
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// How the message is presented.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Success, message)
    }

    /// An informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, message)
    }

    /// A warning: the step ran but something needs attention.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Warning, message)
    }

    /// An error: the step did not run.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, message)
    }

    fn with_level(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// A column as offered by the selection and conversion controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Current column type.
    pub data_type: DataType,
}

/// Everything shown for one loaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileView {
    /// Upload name.
    pub name: String,
    /// Upload size in KiB.
    pub size_kb: f64,
    /// Rows in the current dataset (not just the preview).
    pub row_count: usize,
    /// Columns of the current dataset, in order.
    pub columns: Vec<ColumnInfo>,
    /// First rows of the current dataset.
    pub preview: DataSet,
    /// Summary of the current dataset.
    pub profile: Profile,
    /// Outcome of the action applied during this render, if any.
    pub notices: Vec<Notice>,
    /// Present after a conversion, listing the values that became missing.
    pub conversion: Option<ConversionReport>,
    /// Present after a successful visualize.
    pub chart: Option<BarChart>,
    /// Present after a successful export.
    pub download: Option<Download>,
}

/// Result of one [`render`] pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Page {
    /// One view per upload that loaded, in upload order.
    pub files: Vec<FileView>,
    /// Page-level notices: load failures, unknown action targets, the closing notice.
    pub notices: Vec<Notice>,
}

impl Page {
    /// Downloads produced by this render.
    pub fn downloads(&self) -> impl Iterator<Item = &Download> {
        self.files.iter().filter_map(|f| f.download.as_ref())
    }

    /// `true` if any notice on the page (or on a file) is an error.
    pub fn has_errors(&self) -> bool {
        self.notices
            .iter()
            .chain(self.files.iter().flat_map(|f| &f.notices))
            .any(|n| n.level == NoticeLevel::Error)
    }
}

/// Per-file outcome of applying an action.
#[derive(Default)]
struct Applied {
    notices: Vec<Notice>,
    conversion: Option<ConversionReport>,
    chart: Option<BarChart>,
    download: Option<Download>,
}

/// Re-evaluate the page.
///
/// For each upload in order: load it unless the session already holds it, apply `action` if it
/// targets this file, then build the file's view from the stored dataset. A file that fails to
/// load is reported and skipped; the other files still render. All registry changes happen here.
pub fn render(
    session: &mut Session,
    uploads: &[Upload],
    action: Option<&Action>,
    options: &SweepOptions,
) -> Page {
    let mut page = Page::default();
    let mut action_matched = false;

    for upload in uploads {
        if let Err(err) = session.get_or_load(upload, &options.load) {
            log::warn!("skipping {}: {err}", upload.name);
            page.notices.push(Notice::error(format!("{}: {err}", upload.name)));
            continue;
        }

        let applied = match action.filter(|a| a.file == upload.name) {
            Some(action) => {
                action_matched = true;
                apply(session, action, options)
            }
            None => Applied::default(),
        };

        match session.get(&upload.name) {
            Some(dataset) => page.files.push(file_view(upload, dataset, applied, options)),
            None => page.notices.push(Notice::error(
                SweepError::UnknownFile {
                    name: upload.name.clone(),
                }
                .to_string(),
            )),
        }
    }

    if let Some(action) = action.filter(|_| !action_matched) {
        let err = SweepError::UnknownFile {
            name: action.file.clone(),
        };
        log::warn!("action {} ignored: {err}", action.control_key());
        page.notices.push(Notice::error(err.to_string()));
    }

    if !uploads.is_empty() {
        page.notices.push(Notice::success(ALL_PROCESSED));
    }
    page
}

fn apply(session: &mut Session, action: &Action, options: &SweepOptions) -> Applied {
    let file = action.file.as_str();
    log::info!("{}: {:?}", action.control_key(), action.operation);

    let mut applied = Applied::default();
    let result: SweepResult<()> = match &action.operation {
        Operation::RemoveDuplicates => {
            replace(session, file, |ds| Ok(remove_duplicates(ds)), &mut applied, "Duplicates Removed!")
        }
        Operation::RemoveOutliers => replace(
            session,
            file,
            |ds| Ok(remove_outliers_with(ds, options.iqr_multiplier)),
            &mut applied,
            "Outliers Removed!",
        ),
        Operation::FillMissing => replace(
            session,
            file,
            |ds| Ok(fill_missing(ds)),
            &mut applied,
            "Missing Values have been Filled!",
        ),
        Operation::TrimStrings => {
            replace(session, file, |ds| Ok(trim_strings(ds)), &mut applied, "String Columns Trimmed!")
        }
        Operation::SelectColumns(columns) => {
            let message = format!("Selected {} column(s)", columns.len());
            replace(session, file, |ds| select_columns(ds, columns), &mut applied, &message)
        }
        Operation::ConvertColumn { column, target } => session
            .update(file, |ds| convert_column_type(ds, column, *target))
            .map(|report| {
                applied
                    .notices
                    .push(Notice::success(format!("Column {column} converted to {target}!")));
                if !report.is_clean() {
                    applied.notices.push(Notice::warning(conversion_warning(&report)));
                }
                applied.conversion = Some(report);
            }),
        Operation::Visualize => match session.get(file).map(bar_chart) {
            Some(Ok(chart)) => {
                applied.chart = Some(chart);
                Ok(())
            }
            Some(Err(err @ SweepError::InsufficientColumns { .. })) => {
                applied.notices.push(Notice::warning(err.to_string()));
                Ok(())
            }
            Some(Err(err)) => Err(err),
            None => Err(SweepError::UnknownFile { name: file.to_owned() }),
        },
        Operation::Export(format) => session
            .get(file)
            .ok_or_else(|| SweepError::UnknownFile { name: file.to_owned() })
            .and_then(|ds| export(ds, file, *format))
            .map(|download| {
                applied
                    .notices
                    .push(Notice::success(format!("Converted {file} to {}", format.label())));
                applied.download = Some(download);
            }),
    };

    if let Err(err) = result {
        log::error!("{}: {err}", action.control_key());
        applied.notices.push(Notice::error(err.to_string()));
    }
    applied
}

fn replace<F>(
    session: &mut Session,
    file: &str,
    op: F,
    applied: &mut Applied,
    message: &str,
) -> SweepResult<()>
where
    F: FnOnce(&DataSet) -> SweepResult<DataSet>,
{
    let (before, after) = session.update(file, |ds| {
        let next = op(ds)?;
        let counts = (ds.row_count(), next.row_count());
        Ok((next, counts))
    })?;
    log::debug!("{file}: {before} -> {after} rows");
    applied.notices.push(Notice::success(message));
    Ok(())
}

fn conversion_warning(report: &ConversionReport) -> String {
    let examples: Vec<String> = report
        .failures
        .iter()
        .take(3)
        .map(|f| format!("row {} ({:?}): {}", f.row, f.raw, f.message))
        .collect();
    format!(
        "{} value(s) in {} could not be converted to {} and are now missing: {}",
        report.failures.len(),
        report.column,
        report.target,
        examples.join("; ")
    )
}

fn file_view(upload: &Upload, dataset: &DataSet, applied: Applied, options: &SweepOptions) -> FileView {
    FileView {
        name: upload.name.clone(),
        size_kb: upload.size_kb(),
        row_count: dataset.row_count(),
        columns: dataset
            .schema
            .fields
            .iter()
            .map(|f| ColumnInfo {
                name: f.name.clone(),
                data_type: f.data_type,
            })
            .collect(),
        preview: dataset.head(options.preview_rows),
        profile: describe(dataset),
        notices: applied.notices,
        conversion: applied.conversion,
        chart: applied.chart,
        download: applied.download,
    }
}
