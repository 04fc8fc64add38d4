use std::fs;
use std::path::PathBuf;

use crate::errors::LoaderError;
use crate::formats::{decode_text, fit_row, DelimitedTextLoader, SpreadsheetLoader};
use crate::model::{RawValue, SourceKind};
use crate::registry::{load_with_loaders, SourceLoader};
use crate::{load_source_file, year_from_filename};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

#[test]
fn loads_tab_delimited_export_and_reports_skipped_rows() {
    let path = fixture_path("SOOD_2023_survey_responses.tsv");
    let table = load_source_file(&path, 2023).expect("tsv fixture should load");

    assert_eq!(table.year, 2023);
    assert_eq!(table.source_kind, SourceKind::DelimitedText);
    assert_eq!(table.source_file, "SOOD_2023_survey_responses.tsv");
    assert_eq!(table.headers.len(), 12);
    assert_eq!(table.headers[0], "ResponseId");
    assert_eq!(table.row_count(), 3);

    let lines: Vec<usize> = table.skipped_rows.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![4, 5]);
    assert!(table.skipped_rows[1].reason.contains("expected at most 12 fields"));

    let first = &table.rows[0];
    assert_eq!(first.get("Q2.10.a"), Some(&RawValue::Text("Strongly agree".into())));
    assert_eq!(table.rows[1].get("Q2.10.b"), Some(&RawValue::Empty));
    assert!(table.rows[1].non_empty("Q2.10.b").is_none());
}

#[test]
fn decodes_utf16_exports() {
    let path = fixture_path("SOOD_2024_utf16_export.tsv");
    let table = load_source_file(&path, 2024).expect("utf-16 fixture should load");

    assert_eq!(table.headers, vec!["ResponseId", "Q12_2", "Policy exists"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[1].get("Q12_2"), Some(&RawValue::Text("Disagree".into())));
}

#[test]
fn comma_loader_handles_quoted_fields() {
    let content = "id,Research area,Note\n1,\"Medicine, dentistry\",\"said \"\"hi\"\"\"\n";
    let table = DelimitedTextLoader::comma()
        .parse_content(content, "inline.csv", 2021)
        .expect("inline csv should parse");

    assert_eq!(
        table.rows[0].get("Research area"),
        Some(&RawValue::Text("Medicine, dentistry".into()))
    );
    assert_eq!(table.rows[0].get("Note"), Some(&RawValue::Text("said \"hi\"".into())));
}

#[test]
fn short_rows_are_padded_with_empty_values() {
    let content = "a\tb\tc\n1\t2\n";
    let table = DelimitedTextLoader::tab()
        .parse_content(content, "short.tsv", 2020)
        .unwrap();
    assert_eq!(table.rows[0].get("c"), Some(&RawValue::Empty));
    assert_eq!(table.rows[0].len(), 3);
}

#[test]
fn duplicate_and_blank_headers_are_renamed() {
    let content = "Q1\tQ1\t\n1\t2\t3\n";
    let table = DelimitedTextLoader::tab()
        .parse_content(content, "dupes.tsv", 2020)
        .unwrap();
    assert_eq!(table.headers, vec!["Q1", "Q1 (2)", "column_3"]);
}

#[test]
fn renamed_duplicates_never_shadow_real_question_codes() {
    let content = "Q2.1\tQ2\tQ2\tQ2 (2)\nWithin the last year\tA\tB\tC\n";
    let table = DelimitedTextLoader::tab()
        .parse_content(content, "codes.tsv", 2023)
        .unwrap();

    assert_eq!(table.headers, vec!["Q2.1", "Q2", "Q2 (3)", "Q2 (2)"]);
    let row = &table.rows[0];
    assert_eq!(row.len(), 4);
    assert_eq!(row.get("Q2.1"), Some(&RawValue::Text("Within the last year".into())));
    assert_eq!(row.get("Q2 (3)"), Some(&RawValue::Text("B".into())));
    assert_eq!(row.get("Q2 (2)"), Some(&RawValue::Text("C".into())));
}

#[test]
fn header_only_file_is_empty_data() {
    let err = DelimitedTextLoader::tab()
        .parse_content("a\tb\n", "empty.tsv", 2020)
        .unwrap_err();
    assert!(matches!(err, LoaderError::EmptyData { loader: "TAB_DELIMITED" }));
}

#[test]
fn blank_header_row_is_missing_header() {
    let err = DelimitedTextLoader::tab()
        .parse_content("\t\t\n1\t2\t3\n", "blank.tsv", 2020)
        .unwrap_err();
    assert!(matches!(err, LoaderError::MissingHeader { .. }));
}

#[test]
fn unknown_extension_matches_no_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SOOD_2022_survey.json");
    fs::write(&path, "{}").unwrap();

    let err = load_source_file(&path, 2022).unwrap_err();
    match err {
        LoaderError::NoMatchingLoader { attempts, .. } => {
            let names: Vec<&str> = attempts.iter().map(|a| a.loader).collect();
            assert_eq!(names, vec!["SPREADSHEET", "TAB_DELIMITED", "COMMA_DELIMITED"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn corrupt_workbook_is_a_spreadsheet_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SOOD_2024_survey_responses.xlsx");
    fs::write(&path, b"this is not a zip archive").unwrap();

    let err = SpreadsheetLoader.load(&path, 2024).unwrap_err();
    assert!(matches!(err, LoaderError::Spreadsheet { .. }));
}

#[test]
fn registry_stops_at_first_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.tsv");
    let tab = DelimitedTextLoader::tab();
    let comma = DelimitedTextLoader::comma();
    let loaders: [&dyn SourceLoader; 2] = [&tab, &comma];

    let err = load_with_loaders(&path, 2020, &loaders).unwrap_err();
    assert!(matches!(err, LoaderError::Io { loader: "TAB_DELIMITED", .. }));
}

#[test]
fn years_come_from_file_names() {
    assert_eq!(year_from_filename("SOOD_2017_survey_responses.xlsx").unwrap(), 2017);
    assert_eq!(year_from_filename("sood-2024.tsv").unwrap(), 2024);
    assert_eq!(year_from_filename("Open_Data_Survey_raw_responses.xlsx").unwrap(), 2019);
    assert_eq!(year_from_filename("State of Open Data full dataset.xlsx").unwrap(), 2022);
}

#[test]
fn embedded_digits_are_not_years() {
    assert!(matches!(
        year_from_filename("export_120234.tsv"),
        Err(LoaderError::UnknownYear { .. })
    ));
    assert!(year_from_filename("responses.tsv").is_err());
}

#[test]
fn raw_values_treat_nan_as_empty() {
    assert!(RawValue::Text(" NaN ".into()).is_empty());
    assert!(RawValue::Number(f64::NAN).is_empty());
    assert_eq!(RawValue::Number(4.0).as_text().as_deref(), Some("4"));
    assert_eq!(RawValue::Number(4.5).as_text().as_deref(), Some("4.5"));
    assert_eq!(RawValue::Bool(true).as_number(), None);
}

#[test]
fn byte_order_marks_select_the_encoding() {
    let mut be = vec![0xFE, 0xFF];
    be.extend("Q1\tQ2".encode_utf16().flat_map(|unit| unit.to_be_bytes()));
    assert_eq!(decode_text(&be), "Q1\tQ2");

    assert_eq!(decode_text(b"\xEF\xBB\xBFResponseId"), "ResponseId");
    assert_eq!(decode_text(b"caf\xE9"), "caf\u{FFFD}");
}

#[test]
fn wide_rows_are_skipped_not_truncated() {
    let headers = vec!["ResponseId".to_string(), "Q2.1".to_string()];

    let skipped = fit_row(
        &headers,
        7,
        vec![
            RawValue::Text("R_9".into()),
            RawValue::Text("Never".into()),
            RawValue::Number(3.0),
        ],
    )
    .unwrap_err();
    assert_eq!(skipped.line, 7);
    assert!(skipped.reason.contains("expected at most 2 fields but found 3"));

    // Trailing empty cells past the headers are padding, not data.
    let row = fit_row(
        &headers,
        8,
        vec![RawValue::Text("R_10".into()), RawValue::Empty, RawValue::Empty],
    )
    .unwrap();
    assert_eq!(row.len(), 2);

    let blank = fit_row(&headers, 9, vec![RawValue::Empty, RawValue::Number(f64::NAN)]).unwrap_err();
    assert_eq!(blank.reason, "row contained no values");
}
