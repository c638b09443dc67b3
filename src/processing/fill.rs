//! Mean imputation for numeric columns.

use crate::types::{cell_mut, DataSet, DataType, Value};

use super::reduce::mean;

/// Replace missing cells in every numeric column with that column's mean.
///
/// The mean is taken over the column's non-missing values, so it is unchanged by the fill. An
/// `Int64` column that receives a fill becomes `Float64`; a column with no values at all stays
/// missing. Non-numeric columns are untouched.
pub fn fill_missing(dataset: &DataSet) -> DataSet {
    let mut out = dataset.clone();

    for idx in dataset.schema.numeric_indices() {
        let has_missing = dataset.column(idx).any(Value::is_missing);
        if !has_missing {
            continue;
        }
        let Some(fill) = mean(&dataset.numeric_values(idx)) else {
            continue;
        };

        out.schema.fields[idx].data_type = DataType::Float64;
        for row in &mut out.rows {
            let cell = cell_mut(row, idx);
            *cell = match cell.as_f64() {
                Some(v) if !v.is_nan() => Value::Float64(v),
                _ => Value::Float64(fill),
            };
        }
        log::debug!("fill: column '{}' filled with mean {fill}", dataset.schema.fields[idx].name);
    }

    out
}
