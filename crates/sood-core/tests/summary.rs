use std::sync::Arc;

use chrono::Utc;
use sood_core::catalogue::Category;
use sood_core::config::ImputationScope;
use sood_core::model::{DatasetMetadata, HarmonizedDataset, ProcessedResponse, ResponseValue, YearRange};
use sood_core::summary::{field_trend, responses_frame, summarize};

fn response(id: &str, year: i32, open_data: i64, policy: bool) -> ProcessedResponse {
    let mut response = ProcessedResponse::new(id, year, Arc::default());
    response
        .attitudes
        .insert("openData".into(), ResponseValue::Integer(open_data));
    response
        .institutional_support
        .insert("policyExists".into(), ResponseValue::Boolean(policy));
    response
}

fn dataset(responses: Vec<ProcessedResponse>) -> HarmonizedDataset {
    HarmonizedDataset {
        metadata: DatasetMetadata {
            total_responses: responses.len(),
            year_range: YearRange::from_years(responses.iter().map(|r| r.year)),
            completeness_score: 0.0,
            source_files: Vec::new(),
            processed_at: Utc::now(),
            imputation_scope: ImputationScope::Global,
        },
        responses,
        question_mappings: Vec::new(),
        processing_stats: Default::default(),
    }
}

#[test]
fn summaries_are_sliced_per_year() {
    let dataset = dataset(vec![
        response("a", 2021, 5, true),
        response("b", 2021, 3, false),
        response("c", 2023, 2, true),
    ]);

    let summary = summarize(&dataset).expect("summary should build");

    assert_eq!(summary.years, vec![2021, 2023]);
    assert_eq!(summary.overall.responses, 3);
    assert_eq!(summary.by_year[&2021].responses, 2);
    assert_eq!(summary.by_year[&2023].responses, 1);
    assert_eq!(summary.by_year[&2021].field_means["attitudes.openData"], Some(4.0));
    assert_eq!(
        summary.by_year[&2023].institutional_percentages["institutionalSupport.policyExists"],
        Some(100.0)
    );
    assert_eq!(
        field_trend(&summary, Category::Attitudes, "openData"),
        vec![(2021, Some(4.0)), (2023, Some(2.0))]
    );
}

#[test]
fn unanswered_fields_have_no_mean() {
    let summary = summarize(&dataset(vec![response("a", 2022, 4, false)])).unwrap();
    assert_eq!(summary.overall.field_means["barriers.lackOfTime"], None);
    assert_eq!(summary.overall.fair_maturity_distribution["Expert"], 0);
}

#[test]
fn frame_has_one_row_per_response() {
    let responses = vec![response("a", 2021, 5, true), response("b", 2023, 1, false)];
    let df = responses_frame(&responses).unwrap();
    assert_eq!(df.height(), 2);
    assert!(df.column("attitudes.openData").is_ok());
    assert!(df.column("computed.fairMaturityLevel").is_ok());
}
