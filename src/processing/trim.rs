//! Whitespace trimming for text columns.

use crate::types::{DataSet, Value};

/// Strip leading and trailing whitespace from every value of every text column.
pub fn trim_strings(dataset: &DataSet) -> DataSet {
    let text_cols = dataset.schema.text_indices();
    if text_cols.is_empty() {
        return dataset.clone();
    }
    let width = dataset.column_count();
    dataset.map_rows(|row| {
        let mut out = row.to_vec();
        out.resize(width, Value::Null);
        for &idx in &text_cols {
            if let Some(Value::Utf8(s)) = out.get_mut(idx) {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_owned();
                }
            }
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::trim_strings;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn trims_only_text_columns() {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("n", DataType::Int64),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("  Ada \t".to_string()), Value::Int64(1)],
                vec![Value::Null, Value::Int64(2)],
                vec![Value::Utf8("Grace".to_string()), Value::Null],
            ],
        );

        let out = trim_strings(&ds);
        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.rows[0], vec![Value::Utf8("Ada".to_string()), Value::Int64(1)]);
        assert_eq!(out.rows[1], ds.rows[1]);
        assert_eq!(out.rows[2], ds.rows[2]);
    }

    #[test]
    fn short_rows_are_padded_to_schema_width() {
        let schema = Schema::new(vec![Field::new("a", DataType::Utf8), Field::new("b", DataType::Utf8)]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8(" x ".into())]]);
        let out = trim_strings(&ds);
        assert_eq!(out.rows, vec![vec![Value::Utf8("x".into()), Value::Null]]);
    }
}
