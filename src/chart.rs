//! Bar chart of the first two numeric columns.
//!
//! The chart is a plain data model ([`BarChart`]); the CLI draws it as text, other front ends can
//! serialize it and draw it however they like.

use std::fmt;

use serde::Serialize;

use crate::error::{SweepError, SweepResult};
use crate::types::DataSet;

/// One bar series: a column's values by row position (`None` where the cell is missing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Source column name.
    pub name: String,
    /// One bar height per row; `None` draws no bar.
    pub values: Vec<Option<f64>>,
}

/// Grouped bar chart, one group per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    /// Two series, in column order.
    pub series: Vec<ChartSeries>,
}

impl BarChart {
    /// Number of bar groups (rows).
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, |s| s.values.len())
    }

    /// `true` when there are no rows to plot.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the chart for `dataset`.
///
/// Fails with [`SweepError::InsufficientColumns`] (a warning, not a fatal error) when fewer than
/// two numeric columns exist. Never modifies the dataset.
pub fn bar_chart(dataset: &DataSet) -> SweepResult<BarChart> {
    let numeric = dataset.schema.numeric_indices();
    if numeric.len() < 2 {
        return Err(SweepError::InsufficientColumns { found: numeric.len() });
    }

    let series = numeric
        .into_iter()
        .take(2)
        .map(|idx| ChartSeries {
            name: dataset.schema.fields[idx].name.clone(),
            values: dataset
                .column(idx)
                .map(|v| v.as_f64().filter(|f| f.is_finite()))
                .collect(),
        })
        .collect();
    Ok(BarChart { series })
}

const BAR_WIDTH: usize = 40;

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let name_width = self.series.iter().map(|s| s.name.len()).max().unwrap_or(0);

        for row in 0..self.len() {
            writeln!(f, "{row}")?;
            for s in &self.series {
                let value = s.values.get(row).copied().flatten();
                let bar = match value {
                    Some(v) if max > 0.0 => "#".repeat(((v.abs() / max) * BAR_WIDTH as f64).round() as usize),
                    _ => String::new(),
                };
                let label = value.map_or_else(|| "None".to_owned(), |v| v.to_string());
                writeln!(f, "  {:<name_width$} |{bar} {label}", s.name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::bar_chart;
    use crate::error::SweepError;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn uses_first_two_numeric_columns() {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("a", DataType::Int64),
            Field::new("b", DataType::Float64),
            Field::new("c", DataType::Float64),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("x".into()), Value::Int64(1), Value::Float64(2.5), Value::Float64(9.0)],
                vec![Value::Utf8("y".into()), Value::Int64(4), Value::Null, Value::Float64(9.0)],
            ],
        );

        let chart = bar_chart(&ds).unwrap();
        assert_eq!(chart.len(), 2);
        assert_eq!(chart.series[0].name, "a");
        assert_eq!(chart.series[1].name, "b");
        assert_eq!(chart.series[1].values, vec![Some(2.5), None]);
        assert!(chart.to_string().contains("None"));
    }

    #[test]
    fn warns_with_fewer_than_two_numeric_columns() {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("a", DataType::Int64),
        ]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8("x".into()), Value::Int64(1)]]);
        let err = bar_chart(&ds).unwrap_err();
        assert!(matches!(err, SweepError::InsufficientColumns { found: 1 }));
    }
}
