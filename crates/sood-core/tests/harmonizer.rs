use std::sync::Arc;

use sood_core::catalogue::{Category, CATALOGUE};
use sood_core::config::ImputationScope;
use sood_core::harmonizer::{median, Harmonizer};
use sood_core::model::{FairMaturityLevel, ProcessedResponse, ResponseValue};

fn response(id: &str, year: i32) -> ProcessedResponse {
    ProcessedResponse::new(id, year, Arc::default())
}

fn with(mut response: ProcessedResponse, category: Category, field: &str, value: ResponseValue) -> ProcessedResponse {
    response.category_mut(category).insert(field.to_string(), value);
    response
}

fn open_data(id: &str, year: i32, point: Option<i64>) -> ProcessedResponse {
    let base = with(
        response(id, year),
        Category::Demographics,
        "jobTitle",
        ResponseValue::Text("Professor".into()),
    );
    match point {
        Some(point) => with(base, Category::Attitudes, "openData", ResponseValue::Integer(point)),
        None => base,
    }
}

fn find<'a>(responses: &'a [ProcessedResponse], id: &str) -> &'a ProcessedResponse {
    responses
        .iter()
        .find(|r| r.id == id)
        .unwrap_or_else(|| panic!("missing response {id}"))
}

#[test]
fn median_rounds_the_middle_pair() {
    assert_eq!(median(vec![3, 4, 4, 5]), Some(4));
    assert_eq!(median(vec![2, 5]), Some(4));
    assert_eq!(median(vec![5, 1, 3]), Some(3));
    assert_eq!(median(Vec::new()), None);
}

#[test]
fn missing_attitude_takes_global_median() {
    let responses = vec![
        open_data("a", 2022, Some(3)),
        open_data("b", 2022, Some(4)),
        open_data("c", 2023, Some(4)),
        open_data("d", 2023, Some(5)),
        open_data("e", 2023, None),
    ];

    let result = Harmonizer::default().harmonize(responses);

    assert_eq!(
        find(&result.responses, "e").attitudes.get("openData"),
        Some(&ResponseValue::Integer(4))
    );
    assert_eq!(result.stats.median("all", "attitudes.openData"), Some(4));
    assert_eq!(result.stats.imputed_counts.get("attitudes.openData"), Some(&1));
    // No response answered this, so there is nothing to impute from.
    assert!(find(&result.responses, "e").attitudes.get("openAccess").is_none());
}

#[test]
fn missing_flag_takes_majority_and_ties_are_false() {
    let flag = |id: &str, value: Option<bool>| {
        let base = response(id, 2024);
        match value {
            Some(v) => with(base, Category::InstitutionalSupport, "policyExists", ResponseValue::Boolean(v)),
            None => with(base, Category::Demographics, "country", ResponseValue::Text("Chile".into())),
        }
    };

    let majority = Harmonizer::default().harmonize(vec![
        flag("a", Some(true)),
        flag("b", Some(true)),
        flag("c", Some(false)),
        flag("d", None),
    ]);
    assert_eq!(
        find(&majority.responses, "d").institutional_support.get("policyExists"),
        Some(&ResponseValue::Boolean(true))
    );

    let tie = Harmonizer::default().harmonize(vec![
        flag("a", Some(true)),
        flag("b", Some(false)),
        flag("c", None),
    ]);
    assert_eq!(
        find(&tie.responses, "c").institutional_support.get("policyExists"),
        Some(&ResponseValue::Boolean(false))
    );
}

#[test]
fn demographics_and_fair_awareness_are_never_imputed() {
    let responses = vec![
        with(
            with(response("a", 2022), Category::Demographics, "country", ResponseValue::Text("Kenya".into())),
            Category::FairAwareness,
            "fairPrinciples",
            ResponseValue::Integer(4),
        ),
        with(response("b", 2022), Category::Attitudes, "openData", ResponseValue::Integer(2)),
    ];

    let result = Harmonizer::default().harmonize(responses);
    let b = find(&result.responses, "b");
    assert!(b.demographics.is_empty());
    assert!(b.fair_awareness.is_empty());
    assert!(b.computed.fair_maturity_level.is_none());
}

#[test]
fn normalization_clamps_and_standardizes() {
    let raw = with(
        with(
            with(
                with(response("a", 2021), Category::Attitudes, "openAccess", ResponseValue::Integer(7)),
                Category::Barriers,
                "lackOfTime",
                ResponseValue::Decimal(2.4),
            ),
            Category::Demographics,
            "country",
            ResponseValue::Text(" us ".into()),
        ),
        Category::InstitutionalSupport,
        "trainingProvided",
        ResponseValue::Text("Yes".into()),
    );

    let result = Harmonizer::default().harmonize(vec![raw]);
    let a = &result.responses[0];
    assert_eq!(a.attitudes.get("openAccess"), Some(&ResponseValue::Integer(5)));
    assert_eq!(a.barriers.get("lackOfTime"), Some(&ResponseValue::Integer(2)));
    assert_eq!(a.demographics.get("country"), Some(&ResponseValue::Text("United States".into())));
    assert_eq!(
        a.institutional_support.get("trainingProvided"),
        Some(&ResponseValue::Boolean(true))
    );
}

#[test]
fn raw_row_snapshot_is_shared() {
    let original = response("a", 2020);
    let snapshot = Arc::clone(&original.raw_row);
    let result = Harmonizer::default().harmonize(vec![original]);
    assert!(Arc::ptr_eq(&snapshot, &result.responses[0].raw_row));
}

#[test]
fn composite_scores_are_derived_after_imputation() {
    let mut a = response("a", 2023);
    for (field, point) in [("openAccess", 4), ("openData", 5)] {
        a = with(a, Category::Attitudes, field, ResponseValue::Integer(point));
    }
    for (field, point) in [("fairPrinciples", 4), ("carePrinciples", 4)] {
        a = with(a, Category::FairAwareness, field, ResponseValue::Integer(point));
    }
    for (field, flag) in [("policyExists", true), ("repositoryAvailable", false), ("trainingProvided", true)] {
        a = with(a, Category::InstitutionalSupport, field, ResponseValue::Boolean(flag));
    }

    let result = Harmonizer::default().harmonize(vec![a]);
    let computed = &result.responses[0].computed;
    assert_eq!(computed.overall_attitude_score, Some(4.5));
    assert_eq!(computed.overall_motivation_score, None);
    assert_eq!(computed.fair_maturity_level, Some(FairMaturityLevel::Advanced));
    assert_eq!(computed.institutional_support_score, Some(66.67));
}

#[test]
fn per_year_scope_falls_back_to_global_statistic() {
    let responses = vec![
        open_data("a", 2017, Some(1)),
        open_data("b", 2017, Some(1)),
        open_data("c", 2018, Some(5)),
        open_data("d", 2018, Some(5)),
        open_data("e", 2018, None),
        open_data("f", 2019, None),
    ];

    let result = Harmonizer::new(ImputationScope::PerYear).harmonize(responses);
    assert_eq!(
        find(&result.responses, "e").attitudes.get("openData"),
        Some(&ResponseValue::Integer(5))
    );
    assert_eq!(
        find(&result.responses, "f").attitudes.get("openData"),
        Some(&ResponseValue::Integer(3))
    );
}

#[test]
fn per_discipline_scope_groups_by_research_area() {
    let area = |id: &str, discipline: &str, point: Option<i64>| {
        let base = with(
            response(id, 2022),
            Category::Demographics,
            "researchArea",
            ResponseValue::Text(discipline.into()),
        );
        match point {
            Some(p) => with(base, Category::Motivations, "transparency", ResponseValue::Integer(p)),
            None => base,
        }
    };

    let result = Harmonizer::new(ImputationScope::PerDiscipline).harmonize(vec![
        area("a", "Physics", Some(2)),
        area("b", "Physics", Some(2)),
        area("c", "Biology", Some(5)),
        area("d", "Biology", Some(5)),
        area("e", "Biology", Some(5)),
        area("f", "Physics", None),
    ]);
    assert_eq!(
        find(&result.responses, "f").motivations.get("transparency"),
        Some(&ResponseValue::Integer(2))
    );
}

#[test]
fn imputation_is_order_independent() {
    let build = || {
        vec![
            open_data("a", 2022, Some(2)),
            open_data("b", 2022, None),
            open_data("c", 2023, Some(5)),
            open_data("d", 2023, Some(4)),
            open_data("e", 2024, None),
        ]
    };

    let forward = Harmonizer::default().harmonize(build());
    let mut reversed_input = build();
    reversed_input.reverse();
    let reversed = Harmonizer::default().harmonize(reversed_input);

    for response in &forward.responses {
        let other = find(&reversed.responses, &response.id);
        assert_eq!(response, other);
    }
    assert_eq!(forward.stats.medians, reversed.stats.medians);
}

#[test]
fn harmonizing_twice_changes_nothing() {
    let mut responses = Vec::new();
    for (idx, year) in [2021, 2022, 2023].into_iter().enumerate() {
        let mut r = response(&format!("r{idx}"), year);
        for spec in CATALOGUE {
            let value = match spec.category {
                Category::Demographics => ResponseValue::Text("Other".into()),
                Category::InstitutionalSupport => ResponseValue::Boolean(idx % 2 == 0),
                _ => ResponseValue::Integer(idx as i64 + 2),
            };
            r = with(r, spec.category, spec.id, value);
        }
        responses.push(r);
    }

    let once = Harmonizer::default().harmonize(responses);
    let twice = Harmonizer::default().harmonize(once.responses.clone());

    assert_eq!(once.responses, twice.responses);
    assert_eq!(twice.stats.total_imputed(), 0);
}
