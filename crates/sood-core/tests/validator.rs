use std::sync::Arc;

use sood_core::catalogue::{Category, CATALOGUE};
use sood_core::config::ValidationThresholds;
use sood_core::model::{ProcessedResponse, ResponseValue};
use sood_core::validator::Validator;

fn complete(id: &str, year: i32) -> ProcessedResponse {
    let mut response = ProcessedResponse::new(id, year, Arc::default());
    for spec in CATALOGUE {
        let value = match spec.category {
            Category::Demographics => ResponseValue::Text("Other".into()),
            Category::InstitutionalSupport => ResponseValue::Boolean(true),
            _ => ResponseValue::Integer(3),
        };
        response.category_mut(spec.category).insert(spec.id.to_string(), value);
    }
    response
}

#[test]
fn empty_dataset_is_invalid() {
    let result = Validator::default().validate(&[]);
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec!["Dataset contains no responses".to_string()]);
}

#[test]
fn year_gap_is_a_warning_not_an_error() {
    let responses = vec![complete("a", 2017), complete("b", 2021)];
    let result = Validator::default().validate(&responses);

    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert!(result
        .warnings
        .contains(&"Missing data for years: 2018, 2019, 2020".to_string()));
    assert_eq!(result.year_stats.keys().copied().collect::<Vec<_>>(), vec![2017, 2021]);
    assert_eq!(result.completeness_score, 1.0);
}

#[test]
fn out_of_range_and_wrong_types_are_errors() {
    let mut bad_scale = complete("a", 2022);
    bad_scale
        .attitudes
        .insert("openData".into(), ResponseValue::Integer(7));
    let mut bad_flag = complete("b", 2022);
    bad_flag
        .institutional_support
        .insert("policyExists".into(), ResponseValue::Text("maybe".into()));
    let mut bad_text = complete("c", 2022);
    bad_text
        .demographics
        .insert("country".into(), ResponseValue::Integer(44));

    let responses = vec![bad_scale, bad_flag, bad_text, complete("d", 2022)];
    let result = Validator::default().validate(&responses);

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 3);
    assert!(result.errors[0].contains("attitudes.openData"));
    assert!(result.errors[0].contains("out-of-range value 7"));
    assert!(result.errors[1].contains("expected boolean"));
    assert!(result.errors[2].contains("expected text"));

    assert_eq!(result.stats.invalid_responses, 3);
    assert_eq!(result.stats.valid_responses, 1);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("High invalid response rate: 75.0%")));

    let open_data = &result.stats.field_stats["attitudes.openData"];
    assert_eq!(open_data.valid, 3);
    assert_eq!(open_data.invalid, 1);
}

#[test]
fn duplicate_ids_within_a_year_are_errors() {
    let responses = vec![complete("same", 2022), complete("same", 2022), complete("same", 2023)];
    let result = Validator::default().validate(&responses);

    assert_eq!(result.errors, vec!["Duplicate response id same in 2022".to_string()]);
    assert_eq!(result.year_stats[&2022].invalid_responses, 1);
    assert_eq!(result.year_stats[&2023].invalid_responses, 0);
}

#[test]
fn sparse_responses_raise_completeness_warnings() {
    let mut responses = Vec::new();
    for idx in 0..4 {
        let mut r = ProcessedResponse::new(format!("r{idx}"), 2024, Arc::default());
        r.attitudes.insert("openData".into(), ResponseValue::Integer(4));
        responses.push(r);
    }
    let result = Validator::new(ValidationThresholds::default()).validate(&responses);

    assert!(result.is_valid);
    assert_eq!(result.stats.low_completeness_responses, 4);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("High proportion of low-completeness responses: 100.0% below 25%")));
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("Low overall completeness score")));
}

#[test]
fn field_stats_rank_top_values() {
    let mut responses = Vec::new();
    for (idx, country) in ["Chile", "Chile", "Peru", "Brazil", "Brazil", "Chile"].iter().enumerate() {
        let mut r = ProcessedResponse::new(format!("r{idx}"), 2024, Arc::default());
        r.demographics.insert("country".into(), ResponseValue::Text(country.to_string()));
        responses.push(r);
    }
    responses.push(ProcessedResponse::new("r6", 2024, Arc::default()));
    responses.push(ProcessedResponse::new("r7", 2024, Arc::default()));

    let result = Validator::default().validate(&responses);
    let country = &result.stats.field_stats["demographics.country"];

    assert_eq!(country.total, 8);
    assert_eq!(country.valid, 6);
    assert_eq!(country.missing, 2);
    assert_eq!(country.missing_rate, 0.25);
    assert_eq!(country.unique_values, 3);
    let ranked: Vec<(&str, usize)> = country
        .top_values
        .iter()
        .map(|entry| (entry.value.as_str(), entry.count))
        .collect();
    assert_eq!(ranked, vec![("Chile", 3), ("Brazil", 2), ("Peru", 1)]);
}
