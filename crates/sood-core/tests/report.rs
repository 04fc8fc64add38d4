use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use sood_core::config::ImputationScope;
use sood_core::model::{DatasetMetadata, HarmonizedDataset, ProcessedResponse, ResponseValue, YearRange};
use sood_core::question_mapper::QuestionMapper;
use sood_core::report::{render_validation_report, write_validation_report};
use sood_core::summary::summarize;
use sood_core::validator::Validator;

fn dataset() -> HarmonizedDataset {
    let responses: Vec<ProcessedResponse> = [(2021, 4), (2022, 5), (2023, 2)]
        .into_iter()
        .map(|(year, point)| {
            let mut response = ProcessedResponse::new(format!("R_{year}"), year, Arc::default());
            response
                .attitudes
                .insert("openAccess".into(), ResponseValue::Integer(point));
            response
        })
        .collect();

    HarmonizedDataset {
        metadata: DatasetMetadata {
            total_responses: responses.len(),
            year_range: YearRange::from_years(responses.iter().map(|r| r.year)),
            completeness_score: 0.0,
            source_files: vec!["SOOD_2021_survey_responses.csv".into()],
            processed_at: Utc::now(),
            imputation_scope: ImputationScope::PerYear,
        },
        responses,
        question_mappings: QuestionMapper::seeded().mappings().to_vec(),
        processing_stats: Default::default(),
    }
}

#[test]
fn report_lists_sections_and_caps_errors() {
    let dataset = dataset();
    let mut validation = Validator::default().validate(&dataset.responses);
    validation.is_valid = false;
    validation.errors = (0..53).map(|n| format!("problem {n}")).collect();
    let summary = summarize(&dataset).unwrap();

    let report = render_validation_report(&dataset, &validation, &summary).unwrap();

    assert!(report.contains("- Status: **INVALID**"));
    assert!(report.contains("- Year range: 2021-2023"));
    assert!(report.contains("- Imputation scope: per_year"));
    assert!(report.contains("## Errors (53)"));
    assert!(report.contains("- problem 49\n"));
    assert!(!report.contains("- problem 50\n"));
    assert!(report.contains("- ... and 3 more"));
    assert!(report.contains("## Attitude Trends"));
    assert!(report.contains("| attitudes.openAccess | 4.00 | 5.00 | 2.00 |"));
}

struct FailingWriter;

impl fmt::Write for FailingWriter {
    fn write_str(&mut self, _: &str) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn writer_failures_are_propagated() {
    let dataset = dataset();
    let validation = Validator::default().validate(&dataset.responses);
    let summary = summarize(&dataset).unwrap();

    let result = write_validation_report(&mut FailingWriter, &dataset, &validation, &summary);
    assert_eq!(result, Err(fmt::Error));
}
