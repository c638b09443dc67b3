//! In-memory data cleaning and reshaping.
//!
//! Every operation takes a [`crate::types::DataSet`] by reference and returns a new one; the
//! caller decides whether to store the result (see [`crate::session`]).
//!
//! - [`remove_duplicates()`]: drop repeated rows, keeping the first
//! - [`remove_outliers()`]: per numeric column, keep rows within `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]`
//! - [`fill_missing()`]: numeric gaps get the column mean
//! - [`trim_strings()`]: strip surrounding whitespace in text columns
//! - [`select_columns()`]: narrow to an ordered list of columns
//! - [`convert_column_type()`]: best-effort coercion to text/number/datetime
//! - [`reduce()`]: column reductions (count/sum/min/max/mean)
//!
//! ## Example: fill → outliers → select
//!
//! ```rust
//! use data_sweeper::processing::{fill_missing, remove_outliers, select_columns};
//! use data_sweeper::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("id", DataType::Int64),
//!     Field::new("value", DataType::Int64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Int64(5)],
//!         vec![Value::Int64(2), Value::Null],
//!         vec![Value::Int64(3), Value::Int64(1000)],
//!     ],
//! );
//!
//! let filled = fill_missing(&ds);
//! assert_eq!(filled.rows[1][1], Value::Float64(502.5));
//!
//! let trimmed = remove_outliers(&filled);
//! assert_eq!(trimmed.row_count(), 3);
//!
//! let ids = select_columns(&trimmed, &["id"]).unwrap();
//! assert_eq!(ids.column_names(), vec!["id"]);
//! ```

pub mod convert;
pub mod dedup;
pub mod fill;
pub mod outliers;
pub mod reduce;
pub mod select;
pub mod trim;

pub use convert::{convert_column_type, ConversionReport, ConversionTarget, ValueFailure};
pub use dedup::remove_duplicates;
pub use fill::fill_missing;
pub use outliers::{remove_outliers, remove_outliers_with, IqrBounds, DEFAULT_IQR_MULTIPLIER};
pub use reduce::{reduce, ReduceOp};
pub use select::select_columns;
pub use trim::trim_strings;
