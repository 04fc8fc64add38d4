use sood_core::catalogue::{Category, ValueKind, CATALOGUE};
use sood_core::extractors::{extract_all, extractor_for};
use sood_core::model::ResponseValue;
use sood_core::question_mapper::QuestionMapper;
use sood_loader::{RawRow, RawValue};

fn row(cells: &[(&str, RawValue)]) -> RawRow {
    cells.iter().map(|(header, value)| (*header, value.clone())).collect()
}

fn text(value: &str) -> RawValue {
    RawValue::Text(value.to_string())
}

fn extract(category: Category, raw: &RawRow, year: i32) -> sood_core::model::CategoryValues {
    let mapper = QuestionMapper::seeded();
    extractor_for(category)
        .expect("every category has an extractor")
        .extract(raw, year, &mapper)
}

#[test]
fn agree_maps_to_four() {
    let raw = row(&[("Q2.10.b", text("Agree"))]);
    let attitudes = extract(Category::Attitudes, &raw, 2023);
    assert_eq!(attitudes.get("openData"), Some(&ResponseValue::Integer(4)));
}

#[test]
fn policy_answers_become_booleans() {
    let available = row(&[("Policy exists", text("Available"))]);
    let numeric = row(&[("Institutional data policy", text("7"))]);

    let support = extract(Category::InstitutionalSupport, &available, 2024);
    assert_eq!(support.get("policyExists"), Some(&ResponseValue::Boolean(true)));

    let support = extract(Category::InstitutionalSupport, &numeric, 2024);
    assert_eq!(support.get("policyExists"), Some(&ResponseValue::Boolean(true)));
}

#[test]
fn unconvertible_cell_falls_through_to_next_spelling() {
    let raw = row(&[
        ("Q12_2", text("no idea what this is")),
        ("Open data attitude", text("Strongly agree")),
    ]);
    let attitudes = extract(Category::Attitudes, &raw, 2024);
    assert_eq!(attitudes.get("openData"), Some(&ResponseValue::Integer(5)));
}

#[test]
fn out_of_range_numbers_are_absent() {
    let raw = row(&[
        ("Q12_1", RawValue::Number(4.6)),
        ("Q12_2", RawValue::Number(9.0)),
        ("Q12_3", text("0")),
    ]);
    let attitudes = extract(Category::Attitudes, &raw, 2024);
    assert_eq!(attitudes.get("openAccess"), Some(&ResponseValue::Integer(5)));
    assert!(attitudes.get("openData").is_none());
    assert!(attitudes.get("openPeerReview").is_none());
}

#[test]
fn undecided_institutional_answer_tries_other_spellings() {
    let raw = row(&[
        ("Institutional data policy", text("Don't know")),
        ("Data policy", text("No")),
    ]);
    let support = extract(Category::InstitutionalSupport, &raw, 2022);
    assert_eq!(support.get("policyExists"), Some(&ResponseValue::Boolean(false)));
}

#[test]
fn year_codes_only_apply_to_their_year() {
    let raw = row(&[("Q2.4", text("Engineering"))]);

    let in_2021 = extract(Category::Demographics, &raw, 2021);
    assert_eq!(in_2021.get("researchArea"), Some(&ResponseValue::Text("Engineering".into())));
    assert!(in_2021.get("organizationType").is_none());

    let in_2022 = extract(Category::Demographics, &raw, 2022);
    assert_eq!(in_2022.get("organizationType"), Some(&ResponseValue::Text("Engineering".into())));
    assert!(in_2022.get("researchArea").is_none());
}

#[test]
fn numeric_demographic_cells_render_as_text() {
    let raw = row(&[("Country", RawValue::Number(44.0))]);
    let demographics = extract(Category::Demographics, &raw, 2019);
    assert_eq!(demographics.get("country"), Some(&ResponseValue::Text("44".into())));
}

#[test]
fn fair_familiarity_labels_use_the_scale() {
    let raw = row(&[
        ("Q3.1_1", text("I have never heard of the data principles before now")),
        ("Q3.1_2", text("I am familiar with the data principles")),
    ]);
    let fair = extract(Category::FairAwareness, &raw, 2022);
    assert_eq!(fair.get("fairPrinciples"), Some(&ResponseValue::Integer(1)));
    assert_eq!(fair.get("carePrinciples"), Some(&ResponseValue::Integer(4)));
}

#[test]
fn barrier_labels_are_read_before_generic_scales() {
    let raw = row(&[
        ("Q2.5", text("A lot of effort")),
        ("Q3.2", text("No, too little credit")),
        ("Barrier - Lack of time", text("Not a barrier")),
    ]);
    let barriers = extract(Category::Barriers, &raw, 2022);
    assert!(barriers.get("effortRequired").is_none(), "Q2.5 is a 2017 code");
    assert_eq!(barriers.get("lackOfCredit"), Some(&ResponseValue::Integer(5)));
    assert_eq!(barriers.get("lackOfTime"), Some(&ResponseValue::Integer(1)));
}

#[test]
fn extracted_values_respect_category_shapes() {
    let mut cells: Vec<(&str, RawValue)> = Vec::new();
    let values = [
        text("Strongly agree"),
        text("maybe"),
        RawValue::Number(3.2),
        RawValue::Number(-1.0),
        text("Yes"),
        RawValue::Bool(false),
        text("12"),
    ];
    for (idx, spec) in CATALOGUE.iter().enumerate() {
        for synonym in spec.synonyms {
            cells.push((*synonym, values[idx % values.len()].clone()));
        }
    }
    let raw = row(&cells);
    let mapper = QuestionMapper::seeded();

    for (category, fields) in extract_all(&raw, 2020, &mapper) {
        for (field, value) in fields {
            match category.value_kind() {
                ValueKind::Likert => {
                    let point = value.as_integer().unwrap_or_else(|| panic!("{field} not an integer"));
                    assert!((1..=5).contains(&point), "{field} = {point}");
                }
                ValueKind::Boolean => assert!(value.as_bool().is_some(), "{field} not boolean"),
                ValueKind::Text => assert!(value.as_text().is_some(), "{field} not text"),
            }
        }
    }
}

#[test]
fn empty_row_extracts_nothing() {
    let raw = row(&[("Q12_2", RawValue::Empty), ("Country", text("  "))]);
    let mapper = QuestionMapper::seeded();
    assert!(extract_all(&raw, 2024, &mapper)
        .iter()
        .all(|(_, values)| values.is_empty()));
}

#[test]
fn funder_mandate_answers_follow_their_scale() {
    for (answer, point) in [("Yes", 5), ("No", 1), ("Don't know", 3), ("Unsure", 3)] {
        let raw = row(&[("Q2.2", text(answer))]);
        let attitudes = extract(Category::Attitudes, &raw, 2019);
        assert_eq!(
            attitudes.get("funderMandate"),
            Some(&ResponseValue::Integer(point)),
            "{answer}"
        );
    }
}

#[test]
fn multi_select_motivations_are_ticked_or_not() {
    let raw = row(&[
        ("Q2.3_1", text("Institution requirement")),
        ("Q2.3_2", RawValue::Empty),
        ("Q2.3_3", text("Transparency")),
        ("Q2.3_5", text("Other")),
        ("Motivation - Funder requirement", text("Very important")),
    ]);
    let motivations = extract(Category::Motivations, &raw, 2017);
    assert_eq!(motivations.get("institutionRequirement"), Some(&ResponseValue::Integer(5)));
    assert_eq!(motivations.get("transparency"), Some(&ResponseValue::Integer(5)));
    assert_eq!(motivations.get("increasedCitations"), Some(&ResponseValue::Integer(1)));
    assert_eq!(motivations.get("funderRequirement"), Some(&ResponseValue::Integer(1)));
    assert!(motivations.get("journalRequirement").is_none());
}

#[test]
fn unanswered_multi_select_falls_back_to_synonyms() {
    let raw = row(&[
        ("Q2.3_1", RawValue::Empty),
        ("Q2.3_2", text("  ")),
        ("Motivation - Funder requirement", text("Very important")),
    ]);
    let motivations = extract(Category::Motivations, &raw, 2017);
    assert_eq!(motivations.get("funderRequirement"), Some(&ResponseValue::Integer(5)));
    assert!(motivations.get("transparency").is_none());

    let later = extract(Category::Motivations, &row(&[("Q2.3_1", text("Transparency"))]), 2019);
    assert!(later.get("transparency").is_none());
}
