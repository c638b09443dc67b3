//! `data-sweeper` loads uploaded CSV and Excel files into an in-memory [`types::DataSet`], lets
//! the user clean and reshape each one, and hands the result back as CSV or Excel.
//!
//! Each file is handled on its own. The pipeline for one file is:
//!
//! 1. **Load** ([`ingestion::load`]): pick the parser from the file extension (`.csv` or
//!    `.xlsx`), infer a column type per column.
//! 2. **Clean** ([`processing`]): remove duplicates, remove IQR outliers, fill numeric gaps with
//!    the column mean, trim text.
//! 3. **Reshape**: keep a subset of columns, convert a column to text, number or datetime.
//! 4. **Inspect**: preview rows and a [`profile::describe`] summary; bar chart of the first two
//!    numeric columns ([`chart::bar_chart`]).
//! 5. **Export** ([`export::export`]): CSV or Excel bytes plus an output file name.
//!
//! ## Inferred types
//!
//! Every column gets one of [`types::DataType::Int64`], [`types::DataType::Float64`],
//! [`types::DataType::Bool`], [`types::DataType::Utf8`] or [`types::DataType::DateTime`]. Empty
//! cells (and the usual NA markers such as `NA`, `null`, `NaN`) become [`types::Value::Null`].
//!
//! ## Quick example: load and clean
//!
//! ```
//! use data_sweeper::ingestion::{load, LoadOptions, Upload};
//! use data_sweeper::processing::{fill_missing, remove_duplicates};
//!
//! # fn main() -> Result<(), data_sweeper::SweepError> {
//! let upload = Upload::new("data.csv", "id,value\n1,5\n1,5\n2,\n");
//! let ds = load(&upload, &LoadOptions::default())?;
//! let ds = fill_missing(&remove_duplicates(&ds));
//! assert_eq!(ds.row_count(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sessions and rendering
//!
//! Interactive front ends keep a [`session::Session`] per user and call [`app::render`] after
//! every upload change or control action. Edits accumulate: each action works on the dataset the
//! previous action left behind, until the session ends.
//!
//! ```no_run
//! use data_sweeper::app::{render, Action, Operation};
//! use data_sweeper::config::SweepOptions;
//! use data_sweeper::ingestion::{FileFormat, Upload};
//! use data_sweeper::session::Session;
//!
//! # fn main() -> Result<(), data_sweeper::SweepError> {
//! let uploads = vec![Upload::from_path("sales.xlsx")?];
//! let opts = SweepOptions::default();
//! let mut session = Session::new();
//!
//! render(&mut session, &uploads, Some(&Action::new("sales.xlsx", Operation::RemoveOutliers)), &opts);
//! let page = render(
//!     &mut session,
//!     &uploads,
//!     Some(&Action::new("sales.xlsx", Operation::Export(FileFormat::Csv))),
//!     &opts,
//! );
//! for download in page.downloads() {
//!     std::fs::write(&download.file_name, &download.bytes)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! [`ingestion::LoadOptions::observer`] receives a callback for every load. [`ingestion::LogObserver`]
//! forwards them to the [`log`] facade; combine several with [`ingestion::CompositeObserver`].
//!
//! ## Cargo features
//!
//! - `excel` (default): Excel load via `calamine` and export via `rust_xlsxwriter`. Without it,
//!   `.xlsx` uploads and Excel exports fail with [`SweepError::Malformed`].

pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod profile;
pub mod session;
pub mod types;

pub use error::{SweepError, SweepResult};
