use once_cell::sync::Lazy;
use sood_loader::RawValue;

use crate::catalogue::{Category, FieldSpec};
use crate::model::ResponseValue;

use super::{likert_response, CategoryExtractor, AGREEMENT_SCALE, IMPORTANCE_SCALE};

static MOTIVATION_SCALE: Lazy<Vec<(&'static str, i64)>> = Lazy::new(|| {
    IMPORTANCE_SCALE
        .iter()
        .chain(AGREEMENT_SCALE.iter())
        .copied()
        .collect()
});

pub struct MotivationExtractor;

impl CategoryExtractor for MotivationExtractor {
    fn category(&self) -> Category {
        Category::Motivations
    }

    fn convert(&self, spec: &FieldSpec, value: &RawValue) -> Option<ResponseValue> {
        likert_response(value, spec.ordinal_scale(), &MOTIVATION_SCALE)
    }
}
