//! Per-category field extraction from a raw export row.
//!
//! Every extractor walks the catalogue fields of its category and, for each,
//! tries the header spellings the [`QuestionMapper`] knows for that year. The
//! first non-empty cell that converts wins; a cell that does not convert falls
//! through to the next spelling. Extraction never fails: an unresolved field is
//! simply left out of the sparse record.
//!
//! A spelling ending in `*` names a multi-select question exported as one
//! column per option (`Q2.3_1`, `Q2.3_2`, ...). The field is then read from
//! whether any of those cells carries the field's option label.

mod attitudes;
mod barriers;
mod demographics;
mod fair_awareness;
mod institutional;
mod motivations;

use once_cell::sync::Lazy;
use sood_loader::{RawRow, RawValue};

use crate::catalogue::{harmonize_response_scale, Category, FieldSpec, SCALE_VARIANTS};
use crate::model::{CategoryValues, ResponseValue};
use crate::question_mapper::{header_matches, normalize, QuestionMapper};

pub use attitudes::AttitudeExtractor;
pub use barriers::BarrierExtractor;
pub use demographics::{standardize_demographic, DemographicExtractor};
pub use fair_awareness::FairAwarenessExtractor;
pub use institutional::{boolean_value, InstitutionalSupportExtractor};
pub use motivations::MotivationExtractor;

pub trait CategoryExtractor: Send + Sync {
    fn category(&self) -> Category;
    fn convert(&self, spec: &FieldSpec, value: &RawValue) -> Option<ResponseValue>;

    /// Value for a multi-select option: ticked or left out by a respondent who
    /// answered the question.
    fn convert_option(&self, selected: bool) -> Option<ResponseValue> {
        Some(ResponseValue::Integer(if selected { 5 } else { 1 }))
    }

    fn extract(&self, row: &RawRow, year: i32, mapper: &QuestionMapper) -> CategoryValues {
        let category = self.category();
        let mut values = CategoryValues::new();

        for spec in category.fields() {
            let converted = mapper
                .candidates(category, spec.id, year)
                .into_iter()
                .find_map(|header| {
                    if header.ends_with('*') {
                        let option = spec.selection_option?;
                        option_selected(row, header, option)
                            .and_then(|selected| self.convert_option(selected))
                    } else {
                        row.non_empty(header)
                            .and_then(|value| self.convert(spec, value))
                    }
                });
            if let Some(value) = converted {
                values.insert(spec.id.to_string(), value);
            }
        }

        values
    }
}

static EXTRACTORS: Lazy<Vec<&'static dyn CategoryExtractor>> = Lazy::new(|| {
    vec![
        &DemographicExtractor as &dyn CategoryExtractor,
        &AttitudeExtractor as &dyn CategoryExtractor,
        &MotivationExtractor as &dyn CategoryExtractor,
        &BarrierExtractor as &dyn CategoryExtractor,
        &FairAwarenessExtractor as &dyn CategoryExtractor,
        &InstitutionalSupportExtractor as &dyn CategoryExtractor,
    ]
});

pub fn all_extractors() -> &'static [&'static dyn CategoryExtractor] {
    EXTRACTORS.as_slice()
}

pub fn extractor_for(category: Category) -> Option<&'static dyn CategoryExtractor> {
    all_extractors()
        .iter()
        .copied()
        .find(|extractor| extractor.category() == category)
}

/// Runs every category extractor over one row.
pub fn extract_all(
    row: &RawRow,
    year: i32,
    mapper: &QuestionMapper,
) -> Vec<(Category, CategoryValues)> {
    all_extractors()
        .iter()
        .map(|extractor| (extractor.category(), extractor.extract(row, year, mapper)))
        .collect()
}

/// Whether `option` was ticked among the columns matching `pattern`. `None`
/// when every such column is empty, i.e. the question went unanswered.
pub fn option_selected(row: &RawRow, pattern: &str, option: &str) -> Option<bool> {
    let wanted = normalize(option);
    let mut answered = false;
    for (_, value) in row.iter().filter(|(header, _)| header_matches(pattern, header)) {
        let Some(text) = value.as_text() else {
            continue;
        };
        answered = true;
        if normalize(&text) == wanted {
            return Some(true);
        }
    }
    answered.then_some(false)
}

/// Converts a cell to a 1-5 scale point using a label table.
///
/// Numeric cells are rounded and range-checked. Text is looked up exactly
/// (ignoring ASCII case), then by containment in either direction in table
/// order, and finally parsed as a number.
pub fn likert_value(value: &RawValue, table: &[(&str, i64)]) -> Option<i64> {
    likert_value_on_scale(value, &[], table)
}

/// [`likert_value`] that also knows the field's own ordered answer labels.
/// They are consulted after an exact table match and before containment.
pub fn likert_value_on_scale(
    value: &RawValue,
    scale: &[&str],
    table: &[(&str, i64)],
) -> Option<i64> {
    if let Some(number) = value.as_number() {
        return scale_point(number);
    }

    let text = value.as_text()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((_, point)) = table
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(text))
    {
        return Some(*point);
    }

    if let Some(point) = ordinal_point(text, scale) {
        return Some(point);
    }

    let lowered = text.to_lowercase();
    if let Some((_, point)) = table.iter().find(|(label, _)| {
        let label = label.to_lowercase();
        lowered.contains(&label) || label.contains(&lowered)
    }) {
        return Some(*point);
    }

    text.parse::<f64>().ok().and_then(scale_point)
}

fn scale_point(number: f64) -> Option<i64> {
    if !number.is_finite() {
        return None;
    }
    let rounded = number.round();
    (1.0..=5.0).contains(&rounded).then_some(rounded as i64)
}

/// Position of `text` on an ordered scale, spread evenly over 1-5. Known
/// wording variants of the scale are mapped onto it first.
pub fn ordinal_point(text: &str, scale: &[&str]) -> Option<i64> {
    if scale.len() < 2 {
        return None;
    }
    let label = SCALE_VARIANTS
        .iter()
        .filter(|(canonical, _)| *canonical == scale)
        .fold(text.trim().to_string(), |label, (canonical, variant)| {
            harmonize_response_scale(&label, variant, canonical)
        });
    let idx = scale
        .iter()
        .position(|known| known.eq_ignore_ascii_case(&label))?;
    let span = (scale.len() - 1) as f64;
    Some((1.0 + idx as f64 * 4.0 / span).round() as i64)
}

pub(crate) fn likert_response(
    value: &RawValue,
    scale: &[&str],
    table: &[(&str, i64)],
) -> Option<ResponseValue> {
    likert_value_on_scale(value, scale, table).map(ResponseValue::Integer)
}

// Negative and more specific labels come first: containment is checked in
// table order, and "Disagree" contains "agree".
pub const AGREEMENT_SCALE: &[(&str, i64)] = &[
    ("Strongly disagree", 1),
    ("Somewhat disagree", 2),
    ("Neither agree nor disagree", 3),
    ("Neutral / No opinion", 3),
    ("Strongly agree", 5),
    ("Somewhat agree", 4),
    ("Strongly oppose", 1),
    ("Somewhat oppose", 2),
    ("Strongly support", 5),
    ("Somewhat support", 4),
    ("Disagree", 2),
    ("Neutral", 3),
    ("Agree", 4),
    ("Oppose", 2),
    ("Support", 4),
    ("No opinion", 3),
];

pub const IMPORTANCE_SCALE: &[(&str, i64)] = &[
    ("Not at all important", 1),
    ("Not important", 1),
    ("Unimportant", 1),
    ("Slightly important", 2),
    ("Moderately important", 3),
    ("Very important", 5),
    ("Extremely important", 5),
    ("Important", 4),
];

pub const BARRIER_SCALE: &[(&str, i64)] = &[
    ("Not a barrier", 1),
    ("Not a concern", 1),
    ("No effort", 1),
    ("Minor barrier", 2),
    ("Little effort", 2),
    ("Moderate barrier", 3),
    ("Some effort", 3),
    ("Significant barrier", 4),
    ("Major barrier", 5),
    ("A lot of effort", 5),
    ("No, too little credit", 5),
    ("No, too much credit", 1),
    ("Yes", 1),
];

pub const FAMILIARITY_SCALE: &[(&str, i64)] = &[
    ("I am familiar with the data principles", 4),
    (
        "I have previously heard of the data principles but I am not familiar with them",
        2,
    ),
    ("I have never heard of the data principles before now", 1),
    ("Previously heard of", 2),
    ("Never heard of", 1),
    ("Not at all familiar", 1),
    ("Not familiar", 1),
    ("Slightly familiar", 2),
    ("Somewhat familiar", 3),
    ("Moderately familiar", 3),
    ("Extremely familiar", 5),
    ("Very familiar", 5),
    ("Expert", 5),
    ("Familiar", 4),
];
