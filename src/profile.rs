//! Dataset profiling: the summary table shown under each file's preview.
//!
//! [`describe`] summarises numeric columns (count, mean, std, min, quartiles, max). A dataset
//! without numeric columns is summarised per column by count, distinct values, and the most
//! frequent value instead.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::processing::reduce::{quantile, reduce_at, sample_std, sorted_numeric, ReduceOp};
use crate::types::{DataSet, Value};

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    /// Non-missing values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Summary of one non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    /// Non-missing values.
    pub count: usize,
    /// Distinct non-missing values.
    pub unique: usize,
    /// Most frequent value (first seen wins ties).
    pub top: Option<String>,
    /// Occurrences of `top`.
    pub freq: usize,
}

/// Result of [`describe`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "columns", rename_all = "lowercase")]
pub enum Profile {
    Numeric(Vec<NumericSummary>),
    Categorical(Vec<CategoricalSummary>),
}

/// Summarise `dataset`.
pub fn describe(dataset: &DataSet) -> Profile {
    let numeric = dataset.schema.numeric_indices();
    if numeric.is_empty() {
        let summaries = (0..dataset.column_count())
            .map(|idx| describe_categorical(dataset, idx))
            .collect();
        return Profile::Categorical(summaries);
    }
    Profile::Numeric(numeric.into_iter().map(|idx| describe_numeric(dataset, idx)).collect())
}

fn describe_numeric(dataset: &DataSet, idx: usize) -> NumericSummary {
    let sorted = sorted_numeric(dataset, idx);
    let stat = |op: ReduceOp| reduce_at(dataset, idx, op).as_ref().and_then(Value::as_f64);
    NumericSummary {
        column: dataset.schema.fields[idx].name.clone(),
        count: stat(ReduceOp::Count).map_or(0, |n| n as usize),
        mean: stat(ReduceOp::Mean),
        std: sample_std(&sorted),
        min: stat(ReduceOp::Min),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: stat(ReduceOp::Max),
    }
}

fn describe_categorical(dataset: &DataSet, idx: usize) -> CategoricalSummary {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for text in dataset.column(idx).filter_map(Value::to_text) {
        let n = counts.entry(text.clone()).or_insert(0);
        if *n == 0 {
            order.push(text);
        }
        *n += 1;
    }

    let mut top: Option<(&String, usize)> = None;
    for key in &order {
        let n = counts[key];
        if top.is_none_or(|(_, best)| n > best) {
            top = Some((key, n));
        }
    }

    CategoricalSummary {
        column: dataset.schema.fields[idx].name.clone(),
        count: counts.values().sum(),
        unique: order.len(),
        top: top.map(|(k, _)| k.clone()),
        freq: top.map_or(0, |(_, n)| n),
    }
}

fn fmt_stat(v: Option<f64>) -> String {
    v.map_or_else(|| "NaN".to_owned(), |v| format!("{v:.6}"))
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(cols) => {
                write!(f, "{:<8}", "")?;
                for c in cols {
                    write!(f, " {:>16}", c.column)?;
                }
                writeln!(f)?;
                let rows: [(&str, fn(&NumericSummary) -> String); 8] = [
                    ("count", |s| format!("{:.6}", s.count as f64)),
                    ("mean", |s| fmt_stat(s.mean)),
                    ("std", |s| fmt_stat(s.std)),
                    ("min", |s| fmt_stat(s.min)),
                    ("25%", |s| fmt_stat(s.q25)),
                    ("50%", |s| fmt_stat(s.q50)),
                    ("75%", |s| fmt_stat(s.q75)),
                    ("max", |s| fmt_stat(s.max)),
                ];
                for (label, stat) in rows {
                    write!(f, "{label:<8}")?;
                    for c in cols {
                        write!(f, " {:>16}", stat(c))?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            Self::Categorical(cols) => {
                writeln!(f, "{:<16} {:>8} {:>8} {:>16} {:>8}", "", "count", "unique", "top", "freq")?;
                for c in cols {
                    writeln!(
                        f,
                        "{:<16} {:>8} {:>8} {:>16} {:>8}",
                        c.column,
                        c.count,
                        c.unique,
                        c.top.as_deref().unwrap_or("NaN"),
                        c.freq
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Render the first rows of a dataset as an aligned text table.
pub fn render_table(dataset: &DataSet) -> String {
    let headers = dataset.column_names();
    let cells: Vec<Vec<String>> = dataset
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(c.chars().count());
        }
    }
    let index_width = dataset.row_count().saturating_sub(1).to_string().len();

    let mut out = format!("{:index_width$}", "");
    for (h, &w) in headers.iter().zip(&widths) {
        out.push_str(&format!("  {h:>w$}"));
    }
    out.push('\n');
    for (i, row) in cells.iter().enumerate() {
        out.push_str(&format!("{i:<index_width$}"));
        for (c, &w) in row.iter().zip(&widths) {
            out.push_str(&format!("  {c:>w$}"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{describe, render_table, Profile};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn numeric_profile_matches_describe_layout() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("value", DataType::Float64),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Utf8("a".into()), Value::Float64(5.0)],
                vec![Value::Int64(2), Value::Utf8("b".into()), Value::Null],
                vec![Value::Int64(3), Value::Utf8("c".into()), Value::Float64(1000.0)],
            ],
        );

        let Profile::Numeric(cols) = describe(&ds) else {
            panic!("expected numeric profile");
        };
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].column, "id");
        assert_eq!(cols[0].count, 3);
        assert_eq!(cols[0].mean, Some(2.0));
        assert_eq!(cols[0].std, Some(1.0));
        assert_eq!(cols[0].q25, Some(1.5));
        assert_eq!(cols[1].count, 2);
        assert_eq!(cols[1].mean, Some(502.5));
        assert_eq!(cols[1].max, Some(1000.0));
    }

    #[test]
    fn text_only_profile_counts_values() {
        let schema = Schema::new(vec![Field::new("city", DataType::Utf8)]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("Oslo".into())],
                vec![Value::Utf8("Lima".into())],
                vec![Value::Utf8("Lima".into())],
                vec![Value::Null],
            ],
        );

        let Profile::Categorical(cols) = describe(&ds) else {
            panic!("expected categorical profile");
        };
        assert_eq!(cols[0].count, 3);
        assert_eq!(cols[0].unique, 2);
        assert_eq!(cols[0].top.as_deref(), Some("Lima"));
        assert_eq!(cols[0].freq, 2);
    }

    #[test]
    fn table_has_header_and_one_line_per_row() {
        let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Int64(1)], vec![Value::Null]]);
        let table = render_table(&ds);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("id"));
        assert!(lines[2].ends_with("None"));
    }
}
