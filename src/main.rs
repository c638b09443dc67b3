//! `data-sweeper` command line front end.
//!
//! Runs the per-file pipeline over one or more files, applying the requested steps in the order
//! the interactive page offers them, then prints each file's preview and summary.
//!
//! ```bash
//! data-sweeper sales.csv --fill --outliers --to excel --out-dir cleaned/
//! data-sweeper people.xlsx --trim --convert age=number --columns name,age --chart
//! RUST_LOG=debug data-sweeper data.csv --dedup --json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use data_sweeper::app::{render, Action, FileView, Notice, Operation, Page};
use data_sweeper::chart::BarChart;
use data_sweeper::config::{SweepOptions, DEFAULT_PREVIEW_ROWS};
use data_sweeper::export::Download;
use data_sweeper::ingestion::{ExcelSheetSelection, FileFormat, LoadOptions, LogObserver, Upload};
use data_sweeper::processing::{ConversionTarget, DEFAULT_IQR_MULTIPLIER};
use data_sweeper::profile::render_table;

#[derive(Parser)]
#[command(name = "data-sweeper")]
#[command(about = "Clean, retype, chart and convert CSV/Excel files", long_about = None)]
struct Cli {
    /// Input files (.csv or .xlsx)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Remove duplicate rows
    #[arg(long)]
    dedup: bool,

    /// Remove rows outside the IQR fences of any numeric column
    #[arg(long)]
    outliers: bool,

    /// Fill missing numeric values with the column mean
    #[arg(long)]
    fill: bool,

    /// Trim whitespace in text columns
    #[arg(long)]
    trim: bool,

    /// Keep only these columns, in this order
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Convert a column: COLUMN=string|number|datetime (repeatable)
    #[arg(long = "convert", value_name = "COLUMN=TYPE", value_parser = parse_conversion)]
    conversions: Vec<(String, ConversionTarget)>,

    /// Chart the first two numeric columns
    #[arg(long)]
    chart: bool,

    /// Export each file to this format
    #[arg(long, value_enum)]
    to: Option<ExportTarget>,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Rows shown in each preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Excel sheet to read (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// CSV field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Outlier fence multiplier
    #[arg(long, default_value_t = DEFAULT_IQR_MULTIPLIER)]
    iqr_multiplier: f64,

    /// Print the result as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportTarget {
    Csv,
    Excel,
}

impl From<ExportTarget> for FileFormat {
    fn from(t: ExportTarget) -> Self {
        match t {
            ExportTarget::Csv => FileFormat::Csv,
            ExportTarget::Excel => FileFormat::Excel,
        }
    }
}

fn parse_conversion(s: &str) -> Result<(String, ConversionTarget), String> {
    let (column, target) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected COLUMN=TYPE, got '{s}'"))?;
    if column.is_empty() {
        return Err(format!("missing column name in '{s}'"));
    }
    Ok((column.to_owned(), target.parse()?))
}

impl Cli {
    fn options(&self) -> Result<SweepOptions> {
        let csv_delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("delimiter '{}' is not a single ASCII character", self.delimiter))?;
        let excel_sheet_selection = match &self.sheet {
            Some(name) => ExcelSheetSelection::Sheet(name.clone()),
            None => ExcelSheetSelection::First,
        };
        Ok(SweepOptions {
            load: LoadOptions {
                csv_delimiter,
                excel_sheet_selection,
                observer: Some(Arc::new(LogObserver)),
                ..Default::default()
            },
            preview_rows: self.preview_rows,
            iqr_multiplier: self.iqr_multiplier,
        })
    }

    /// Requested operations, in page order.
    fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        if self.dedup {
            ops.push(Operation::RemoveDuplicates);
        }
        if self.outliers {
            ops.push(Operation::RemoveOutliers);
        }
        if self.fill {
            ops.push(Operation::FillMissing);
        }
        if self.trim {
            ops.push(Operation::TrimStrings);
        }
        if let Some(columns) = &self.columns {
            ops.push(Operation::SelectColumns(columns.clone()));
        }
        for (column, target) in &self.conversions {
            ops.push(Operation::ConvertColumn {
                column: column.clone(),
                target: *target,
            });
        }
        if self.chart {
            ops.push(Operation::Visualize);
        }
        if let Some(to) = self.to {
            ops.push(Operation::Export(to.into()));
        }
        ops
    }
}

/// What one action produced for its file.
#[derive(Serialize)]
struct Step {
    file: String,
    control: String,
    notices: Vec<Notice>,
    chart: Option<BarChart>,
    download: Option<Download>,
}

#[derive(Serialize)]
struct Report {
    steps: Vec<Step>,
    page: Page,
}

fn main() -> Result<()> {
    // RUST_LOG=debug shows per-step row counts.
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.options()?;

    let uploads = cli
        .files
        .iter()
        .map(|path| Upload::from_path(path).with_context(|| format!("reading {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let mut session = data_sweeper::session::Session::new();
    let mut steps = Vec::new();
    for operation in cli.operations() {
        for upload in &uploads {
            let action = Action::new(upload.name.clone(), operation.clone());
            let page = render(&mut session, &uploads, Some(&action), &options);
            let Some(view) = page.files.into_iter().find(|f| f.name == upload.name) else {
                // Failed to load; reported on the final page.
                continue;
            };
            if let Some(download) = &view.download {
                write_download(&cli.out_dir, download)?;
            }
            steps.push(Step {
                file: view.name,
                control: action.control_key().to_string(),
                notices: view.notices,
                chart: view.chart,
                download: view.download,
            });
        }
    }

    let page = render(&mut session, &uploads, None, &options);
    let failed = page.has_errors() || steps.iter().flat_map(|s| &s.notices).any(is_error);

    if cli.json {
        let report = Report { steps, page };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_steps(&steps);
        print_page(&page);
    }

    session.end();
    if failed {
        log::warn!("finished with errors");
    }
    Ok(())
}

fn is_error(notice: &Notice) -> bool {
    notice.level == data_sweeper::app::NoticeLevel::Error
}

fn write_download(out_dir: &Path, download: &Download) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(&download.file_name);
    fs::write(&path, &download.bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn print_steps(steps: &[Step]) {
    for step in steps {
        for notice in &step.notices {
            println!("{}: {notice}", step.file);
        }
        if let Some(chart) = &step.chart {
            println!("{}: chart", step.file);
            print!("{chart}");
        }
        if let Some(download) = &step.download {
            println!("{}: saved {}", step.file, download.file_name);
        }
    }
    if !steps.is_empty() {
        println!();
    }
}

fn print_page(page: &Page) {
    for view in &page.files {
        print_file(view);
    }
    for notice in &page.notices {
        println!("{notice}");
    }
}

fn print_file(view: &FileView) {
    println!("== {} ({:.2} KB) ==", view.name, view.size_kb);
    println!("{} rows x {} columns", view.row_count, view.columns.len());
    let columns: Vec<String> = view
        .columns
        .iter()
        .map(|c| format!("{} ({})", c.name, c.data_type))
        .collect();
    println!("columns: {}", columns.join(", "));
    println!();
    println!("Preview:");
    print!("{}", render_table(&view.preview));
    println!();
    println!("Summary:");
    print!("{}", view.profile);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_operations_in_page_order() {
        let cli = Cli::try_parse_from([
            "data-sweeper", "f.csv", "--to", "csv", "--convert", "a=number", "--trim", "--dedup",
            "--columns", "a,b", "--chart", "--fill", "--outliers",
        ])
        .unwrap();

        assert_eq!(
            cli.operations(),
            vec![
                Operation::RemoveDuplicates,
                Operation::RemoveOutliers,
                Operation::FillMissing,
                Operation::TrimStrings,
                Operation::SelectColumns(vec!["a".into(), "b".into()]),
                Operation::ConvertColumn {
                    column: "a".into(),
                    target: ConversionTarget::Number,
                },
                Operation::Visualize,
                Operation::Export(FileFormat::Csv),
            ]
        );
    }

    #[test]
    fn no_flags_means_no_operations() {
        let cli = Cli::try_parse_from(["data-sweeper", "f.csv"]).unwrap();
        assert!(cli.operations().is_empty());
    }

    #[test]
    fn conversion_splits_on_last_equals() {
        assert_eq!(
            parse_conversion("x=y=number").unwrap(),
            ("x=y".to_string(), ConversionTarget::Number)
        );
        assert_eq!(
            parse_conversion("when=Date").unwrap(),
            ("when".to_string(), ConversionTarget::DateTime)
        );
        assert!(parse_conversion("=number").is_err());
        assert!(parse_conversion("a").is_err());
        assert!(parse_conversion("a=bogus").unwrap_err().contains("bogus"));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let cli = Cli::try_parse_from(["data-sweeper", "f.csv", "-d", "é"]).unwrap();
        assert!(cli.options().is_err());

        let cli = Cli::try_parse_from(["data-sweeper", "f.csv", "-d", ";", "--sheet", "Staff"]).unwrap();
        let opts = cli.options().unwrap();
        assert_eq!(opts.load.csv_delimiter, b';');
        assert_eq!(
            opts.load.excel_sheet_selection,
            ExcelSheetSelection::Sheet("Staff".into())
        );
    }
}
