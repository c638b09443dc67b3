//! Column selection.

use crate::error::{SweepError, SweepResult};
use crate::types::{DataSet, Schema, Value};

/// Narrow `dataset` to exactly `columns`, in the given order.
///
/// Fails with [`SweepError::UnknownColumn`] for a name that is not in the dataset (a dropped
/// column cannot be brought back) and [`SweepError::DuplicateColumn`] for a repeated name.
pub fn select_columns<S: AsRef<str>>(dataset: &DataSet, columns: &[S]) -> SweepResult<DataSet> {
    let mut idxs: Vec<usize> = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let idx = dataset
            .schema
            .index_of(name)
            .ok_or_else(|| SweepError::UnknownColumn { column: name.to_owned() })?;
        if idxs.contains(&idx) {
            return Err(SweepError::DuplicateColumn { column: name.to_owned() });
        }
        idxs.push(idx);
    }

    let schema = Schema::new(idxs.iter().map(|&i| dataset.schema.fields[i].clone()).collect());
    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            idxs.iter()
                .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();
    Ok(DataSet::new(schema, rows))
}
