use sood_loader::RawValue;

use crate::catalogue::{Category, FieldSpec};
use crate::model::ResponseValue;

use super::CategoryExtractor;

/// `None` marks an undecided answer, which resolves to nothing.
/// Negated phrases precede the positive words they contain.
const BOOLEAN_LABELS: &[(&str, Option<bool>)] = &[
    ("Don't know", None),
    ("Do not know", None),
    ("Unsure", None),
    ("Not sure", None),
    ("Prefer not to say", None),
    ("Not applicable", None),
    ("N/A", None),
    ("Not available", Some(false)),
    ("Unavailable", Some(false)),
    ("Does not exist", Some(false)),
    ("Not provided", Some(false)),
    ("Available", Some(true)),
    ("Exists", Some(true)),
    ("Provided", Some(true)),
    ("Yes", Some(true)),
    ("True", Some(true)),
    ("No", Some(false)),
    ("False", Some(false)),
    ("None", Some(false)),
];

/// Converts a cell to a boolean: native booleans pass through, labels are
/// matched exactly and then by containment, numbers are true when positive.
pub fn boolean_value(value: &RawValue) -> Option<bool> {
    match value {
        RawValue::Bool(flag) => return Some(*flag),
        RawValue::Number(number) if number.is_finite() => return Some(*number > 0.0),
        _ => {}
    }

    let text = value.as_text()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((_, flag)) = BOOLEAN_LABELS
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(text))
    {
        return *flag;
    }

    let lowered = text.to_lowercase();
    if let Some((_, flag)) = BOOLEAN_LABELS.iter().find(|(label, _)| {
        let label = label.to_lowercase();
        lowered.contains(&label) || label.contains(&lowered)
    }) {
        return *flag;
    }

    text.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .map(|number| number > 0.0)
}

pub struct InstitutionalSupportExtractor;

impl CategoryExtractor for InstitutionalSupportExtractor {
    fn category(&self) -> Category {
        Category::InstitutionalSupport
    }

    fn convert(&self, _spec: &FieldSpec, value: &RawValue) -> Option<ResponseValue> {
        boolean_value(value).map(ResponseValue::Boolean)
    }

    fn convert_option(&self, selected: bool) -> Option<ResponseValue> {
        Some(ResponseValue::Boolean(selected))
    }
}
