//! Load entrypoints and implementations.
//!
//! Most callers should use [`load`] (from [`unified`]) which:
//!
//! - picks the format from the uploaded file's extension (`.csv`, `.xlsx`)
//! - parses the bytes into an in-memory [`crate::types::DataSet`], inferring column types
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{CompositeObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, LogObserver};
pub use unified::{load, load_from_path, ExcelSheetSelection, FileFormat, LoadOptions, Upload};

/// Make header names unique and non-blank.
///
/// Blank names become `Unnamed: {idx}`; repeats get a `.1`, `.2`, ... suffix.
pub(crate) fn unique_headers(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 0usize;
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{base}.{n}");
        }
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::unique_headers;

    #[test]
    fn duplicate_and_blank_headers_are_renamed() {
        let names = unique_headers(["a", "", "a", "b", "a"].map(String::from));
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1", "b", "a.2"]);
    }
}
