use sood_loader::RawValue;

use crate::catalogue::{Category, FieldSpec};
use crate::model::ResponseValue;

use super::{likert_response, CategoryExtractor, FAMILIARITY_SCALE};

pub struct FairAwarenessExtractor;

impl CategoryExtractor for FairAwarenessExtractor {
    fn category(&self) -> Category {
        Category::FairAwareness
    }

    fn convert(&self, spec: &FieldSpec, value: &RawValue) -> Option<ResponseValue> {
        likert_response(value, spec.ordinal_scale(), FAMILIARITY_SCALE)
    }
}
