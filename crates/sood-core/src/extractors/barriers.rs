use once_cell::sync::Lazy;
use sood_loader::RawValue;

use crate::catalogue::{Category, FieldSpec};
use crate::model::ResponseValue;

use super::{likert_response, CategoryExtractor, AGREEMENT_SCALE, BARRIER_SCALE, IMPORTANCE_SCALE};

// Barrier labels are tried before importance and agreement wording so that
// "Not a barrier" resolves to 1.
static BARRIER_LABELS: Lazy<Vec<(&'static str, i64)>> = Lazy::new(|| {
    BARRIER_SCALE
        .iter()
        .chain(IMPORTANCE_SCALE.iter())
        .chain(AGREEMENT_SCALE.iter())
        .copied()
        .collect()
});

/// Higher values mean a larger obstacle to sharing.
pub struct BarrierExtractor;

impl CategoryExtractor for BarrierExtractor {
    fn category(&self) -> Category {
        Category::Barriers
    }

    fn convert(&self, spec: &FieldSpec, value: &RawValue) -> Option<ResponseValue> {
        likert_response(value, spec.ordinal_scale(), &BARRIER_LABELS)
    }
}
