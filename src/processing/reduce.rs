//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count non-missing values.
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values, ignoring nulls. Always `Float64`.
    Mean,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-null values
///   or the column is not numeric.
/// - For `Count`, always returns `Some(Value::Int64(non_null_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    reduce_at(dataset, idx, op)
}

/// Same as [`reduce`], addressing the column by position.
pub fn reduce_at(dataset: &DataSet, idx: usize, op: ReduceOp) -> Option<Value> {
    let field = dataset.schema.fields.get(idx)?;

    if op == ReduceOp::Count {
        let n = dataset.column(idx).filter(|v| !v.is_missing()).count();
        return Some(Value::Int64(n as i64));
    }

    let out = match (field.data_type, op) {
        (DataType::Int64, ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max) => {
            let mut acc: Option<i64> = None;
            for v in dataset.column(idx) {
                if let Value::Int64(v) = v {
                    acc = Some(match (op, acc) {
                        (ReduceOp::Sum, Some(a)) => a.saturating_add(*v),
                        (ReduceOp::Min, Some(a)) => a.min(*v),
                        (ReduceOp::Max, Some(a)) => a.max(*v),
                        (_, _) => *v,
                    });
                }
            }
            acc.map(Value::Int64)
        }
        (DataType::Float64, ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max) => {
            let mut acc: Option<f64> = None;
            for v in dataset.numeric_values(idx) {
                acc = Some(match (op, acc) {
                    (ReduceOp::Sum, Some(a)) => a + v,
                    (ReduceOp::Min, Some(a)) => a.min(v),
                    (ReduceOp::Max, Some(a)) => a.max(v),
                    (_, _) => v,
                });
            }
            acc.map(Value::Float64)
        }
        (DataType::Int64 | DataType::Float64, ReduceOp::Mean) => mean(&dataset.numeric_values(idx)).map(Value::Float64),
        _ => None,
    };
    Some(out.unwrap_or(Value::Null))
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile `q` (0..=1) of `sorted` using linear interpolation between the closest ranks.
///
/// `sorted` must be ascending. Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);
    Some(a + (b - a) * (pos - lo as f64))
}

/// Non-missing numeric values of column `idx`, sorted ascending.
pub fn sorted_numeric(dataset: &DataSet, idx: usize) -> Vec<f64> {
    let mut values = dataset.numeric_values(idx);
    values.sort_by(f64::total_cmp);
    values
}
