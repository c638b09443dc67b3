//! Interquartile-range outlier filter.

use crate::types::DataSet;

use super::reduce::{quantile, sorted_numeric};

/// Standard Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Acceptance window computed for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    /// First quartile.
    pub q1: f64,
    /// Third quartile.
    pub q3: f64,
    /// Lowest accepted value, `q1 - k·IQR`.
    pub lower: f64,
    /// Highest accepted value, `q3 + k·IQR`.
    pub upper: f64,
}

impl IqrBounds {
    /// Fences for an ascending slice; `None` when the slice is empty.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Option<Self> {
        let q1 = quantile(sorted, 0.25)?;
        let q3 = quantile(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Whether `v` lies inside the closed window.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.lower && v <= self.upper
    }
}

/// Remove outliers from every numeric column using the 1.5·IQR rule.
pub fn remove_outliers(dataset: &DataSet) -> DataSet {
    remove_outliers_with(dataset, DEFAULT_IQR_MULTIPLIER)
}

/// Remove outliers with a custom fence multiplier.
///
/// Columns are processed one after another in schema order, each over the rows that survived
/// the previous columns, so quartiles for a later column reflect the earlier cuts. Rows with a
/// missing value in the column being filtered are dropped. Running this again on its own output
/// may remove further rows.
pub fn remove_outliers_with(dataset: &DataSet, multiplier: f64) -> DataSet {
    let mut out = dataset.clone();
    for idx in dataset.schema.numeric_indices() {
        let bounds = IqrBounds::from_sorted(&sorted_numeric(&out, idx), multiplier);
        let before = out.row_count();
        out = out.filter_rows(|row| {
            match (bounds, row.get(idx).and_then(|v| v.as_f64())) {
                (Some(b), Some(v)) => b.contains(v),
                _ => false,
            }
        });
        log::debug!(
            "outliers: column '{}' bounds={bounds:?} removed {} rows",
            dataset.schema.fields[idx].name,
            before - out.row_count()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{remove_outliers, IqrBounds};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn values(ds: &DataSet, idx: usize) -> Vec<Value> {
        ds.rows.iter().map(|r| r[idx].clone()).collect()
    }

    #[test]
    fn drops_values_outside_fences() {
        let schema = Schema::new(vec![Field::new("v", DataType::Int64)]);
        let rows = [1, 2, 3, 4, 5, 100].iter().map(|v| vec![Value::Int64(*v)]).collect();
        let ds = DataSet::new(schema, rows);

        let out = remove_outliers(&ds);
        assert_eq!(
            values(&out, 0),
            [1, 2, 3, 4, 5].iter().map(|v| Value::Int64(*v)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn keeps_all_rows_of_filled_scenario() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("value", DataType::Float64),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Float64(5.0)],
                vec![Value::Int64(2), Value::Float64(502.5)],
                vec![Value::Int64(3), Value::Float64(1000.0)],
            ],
        );
        let b = IqrBounds::from_sorted(&[5.0, 502.5, 1000.0], 1.5).unwrap();
        assert_eq!((b.lower, b.upper), (-492.5, 1497.5));
        assert_eq!(remove_outliers(&ds), ds);
    }

    #[test]
    fn columns_filter_sequentially_and_drop_missing() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Float64),
            Field::new("b", DataType::Float64),
            Field::new("label", DataType::Utf8),
        ]);
        let mut rows: Vec<Vec<Value>> = (0..8)
            .map(|i| vec![Value::Float64(i as f64), Value::Float64(10.0), Value::Utf8(format!("r{i}"))])
            .collect();
        rows.push(vec![Value::Float64(500.0), Value::Float64(10.0), Value::Utf8("far-a".into())]);
        rows.push(vec![Value::Float64(3.0), Value::Null, Value::Utf8("no-b".into())]);
        let ds = DataSet::new(schema, rows);

        let out = remove_outliers(&ds);
        let labels: Vec<Value> = values(&out, 2);
        assert_eq!(labels.len(), 8);
        assert!(!labels.contains(&Value::Utf8("far-a".into())));
        assert!(!labels.contains(&Value::Utf8("no-b".into())));
        assert_eq!(out.schema, ds.schema);
    }

    #[test]
    fn repeated_application_can_shrink_further() {
        let schema = Schema::new(vec![Field::new("v", DataType::Float64)]);
        let rows = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 22.0, 40.0]
            .iter()
            .map(|v| vec![Value::Float64(*v)])
            .collect();
        let ds = DataSet::new(schema, rows);

        let once = remove_outliers(&ds);
        let twice = remove_outliers(&once);
        assert!(once.row_count() < ds.row_count());
        assert!(twice.row_count() <= once.row_count());
    }

    #[test]
    fn dataset_without_numeric_columns_is_unchanged() {
        let schema = Schema::new(vec![Field::new("s", DataType::Utf8)]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8("x".into())], vec![Value::Null]]);
        assert_eq!(remove_outliers(&ds), ds);
    }

    #[test]
    fn all_missing_numeric_column_drops_every_row() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64),
            Field::new("b", DataType::Float64),
        ]);
        let rows = (1..=3).map(|i| vec![Value::Int64(i), Value::Null]).collect();
        let ds = DataSet::new(schema, rows);

        let out = remove_outliers(&ds);
        assert_eq!(out.row_count(), 0);
        assert_eq!(out.schema, ds.schema);
    }
}
