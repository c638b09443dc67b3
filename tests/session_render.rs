use data_sweeper::app::{render, Action, NoticeLevel, Operation, Page, ALL_PROCESSED};
use data_sweeper::config::SweepOptions;
use data_sweeper::ingestion::{FileFormat, Upload};
use data_sweeper::processing::ConversionTarget;
use data_sweeper::profile::Profile;
use data_sweeper::session::Session;
use data_sweeper::types::{DataType, Value};

fn fixture(name: &str) -> Upload {
    Upload::from_path(format!("tests/fixtures/{name}")).unwrap()
}

fn run(session: &mut Session, uploads: &[Upload], file: &str, operation: Operation) -> Page {
    let action = Action::new(file, operation);
    render(session, uploads, Some(&action), &SweepOptions::default())
}

fn column_values(page: &Page, file: usize, col: usize) -> Vec<Value> {
    page.files[file].preview.rows.iter().map(|r| r[col].clone()).collect()
}

#[test]
fn first_render_shows_preview_and_profile() {
    let uploads = vec![fixture("data.csv")];
    let mut session = Session::new();
    let page = render(&mut session, &uploads, None, &SweepOptions::default());

    let view = &page.files[0];
    assert_eq!(view.name, "data.csv");
    assert_eq!(view.row_count, 3);
    assert!((view.size_kb - uploads[0].size() as f64 / 1024.0).abs() < f64::EPSILON);
    let Profile::Numeric(cols) = &view.profile else {
        panic!("expected numeric profile");
    };
    assert_eq!(cols[1].count, 2);
    assert_eq!(page.notices, vec![data_sweeper::app::Notice::success(ALL_PROCESSED)]);
}

#[test]
fn fill_then_outliers_keeps_all_rows() {
    let uploads = vec![fixture("data.csv")];
    let mut session = Session::new();

    let page = run(&mut session, &uploads, "data.csv", Operation::FillMissing);
    assert_eq!(page.files[0].notices[0].message, "Missing Values have been Filled!");
    assert_eq!(
        column_values(&page, 0, 1),
        vec![Value::Float64(5.0), Value::Float64(502.5), Value::Float64(1000.0)]
    );

    let page = run(&mut session, &uploads, "data.csv", Operation::RemoveOutliers);
    assert_eq!(page.files[0].notices[0].message, "Outliers Removed!");
    assert_eq!(page.files[0].row_count, 3);
}

#[test]
fn select_keeps_requested_columns_in_order() {
    let uploads = vec![fixture("people.csv")];
    let mut session = Session::new();

    let page = run(
        &mut session,
        &uploads,
        "people.csv",
        Operation::SelectColumns(vec!["score".into(), "id".into()]),
    );
    let names: Vec<&str> = page.files[0].columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["score", "id"]);

    let page = run(
        &mut session,
        &uploads,
        "people.csv",
        Operation::SelectColumns(vec!["name".into()]),
    );
    assert_eq!(page.files[0].notices[0].level, NoticeLevel::Error);
    assert_eq!(page.files[0].columns.len(), 2);
}

#[test]
fn edits_accumulate_across_actions() {
    let uploads = vec![fixture("people.csv")];
    let mut session = Session::new();

    run(&mut session, &uploads, "people.csv", Operation::RemoveDuplicates);
    run(&mut session, &uploads, "people.csv", Operation::TrimStrings);
    let page = run(&mut session, &uploads, "people.csv", Operation::FillMissing);

    let view = &page.files[0];
    assert_eq!(view.row_count, 3);
    assert_eq!(view.preview.rows[0][1], Value::Utf8("Ada".into()));
    assert_eq!(view.preview.rows[2][2], Value::Float64(92.875));
}

#[test]
fn conversion_reports_unparseable_values() {
    let uploads = vec![Upload::new("codes.csv", "code\n1\nx\n3\n")];
    let mut session = Session::new();

    let page = run(
        &mut session,
        &uploads,
        "codes.csv",
        Operation::ConvertColumn {
            column: "code".into(),
            target: ConversionTarget::Number,
        },
    );
    let view = &page.files[0];
    assert_eq!(view.notices[0].message, "Column code converted to number!");
    assert_eq!(view.notices[1].level, NoticeLevel::Warning);
    assert!(view.notices[1].message.contains("\"x\""));

    let report = view.conversion.as_ref().unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].raw, "x");
    assert_eq!(view.columns[0].data_type, DataType::Float64);
    assert_eq!(
        column_values(&page, 0, 0),
        vec![Value::Float64(1.0), Value::Null, Value::Float64(3.0)]
    );
}

#[test]
fn converting_unknown_column_is_an_error_notice() {
    let uploads = vec![fixture("data.csv")];
    let mut session = Session::new();
    let page = run(
        &mut session,
        &uploads,
        "data.csv",
        Operation::ConvertColumn {
            column: "nope".into(),
            target: ConversionTarget::Text,
        },
    );
    let notice = &page.files[0].notices[0];
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Error converting nope: column not found");
}

#[test]
fn visualize_needs_two_numeric_columns() {
    let uploads = vec![fixture("data.csv"), Upload::new("names.csv", "name,n\na,1\n")];
    let mut session = Session::new();

    let page = run(&mut session, &uploads, "data.csv", Operation::Visualize);
    let chart = page.files[0].chart.as_ref().unwrap();
    assert_eq!(chart.len(), 3);
    assert!(page.files[1].chart.is_none());

    let page = run(&mut session, &uploads, "names.csv", Operation::Visualize);
    assert!(page.files[1].chart.is_none());
    assert_eq!(page.files[1].notices[0].level, NoticeLevel::Warning);
    assert_eq!(
        page.files[1].notices[0].message,
        "Visualization requires at least 2 numeric columns (found 1)."
    );
}

#[test]
fn export_attaches_download_without_changing_data() {
    let uploads = vec![fixture("data.csv")];
    let mut session = Session::new();

    let page = run(&mut session, &uploads, "data.csv", Operation::Export(FileFormat::Csv));
    let download = page.files[0].download.as_ref().unwrap();
    assert_eq!(download.file_name, "data.csv");
    assert_eq!(download.bytes, b"id,value\n1,5\n2,\n3,1000\n");
    assert_eq!(page.downloads().count(), 1);
    assert_eq!(page.files[0].row_count, 3);
}

#[test]
fn unsupported_file_is_skipped_and_others_still_render() {
    let uploads = vec![
        Upload::new("notes.txt", "hello"),
        fixture("data.csv"),
    ];
    let mut session = Session::new();
    let page = render(&mut session, &uploads, None, &SweepOptions::default());

    assert_eq!(page.files.len(), 1);
    assert_eq!(page.files[0].name, "data.csv");
    assert_eq!(page.notices[0].level, NoticeLevel::Error);
    assert!(page.notices[0].message.contains("Unsupported file type: .txt"));
    assert_eq!(page.notices.last().unwrap().message, ALL_PROCESSED);
    assert!(page.has_errors());
    assert!(!session.contains("notes.txt"));
}

#[test]
fn preview_rows_follow_options() {
    let uploads = vec![fixture("people.csv")];
    let mut session = Session::new();
    let opts = SweepOptions {
        preview_rows: 2,
        ..Default::default()
    };
    let page = render(&mut session, &uploads, None, &opts);
    assert_eq!(page.files[0].preview.row_count(), 2);
    assert_eq!(page.files[0].row_count, 4);
}

#[test]
fn export_of_oddly_named_upload_gets_clean_file_name() {
    let uploads = vec![Upload::new("a.é.csv/", "id\n1\n")];
    let mut session = Session::new();

    let page = run(&mut session, &uploads, "a.é.csv/", Operation::Export(FileFormat::Csv));
    let download = page.files[0].download.as_ref().unwrap();
    assert_eq!(download.file_name, "a.é.csv");
    assert_eq!(download.bytes, b"id\n1\n");
}
