use sood_loader::RawValue;

use crate::catalogue::{Category, FieldSpec};
use crate::model::ResponseValue;

use super::{likert_response, CategoryExtractor, AGREEMENT_SCALE};

/// Agreement (and, for the 2019 mandate question, support) on a 1-5 scale.
pub struct AttitudeExtractor;

impl CategoryExtractor for AttitudeExtractor {
    fn category(&self) -> Category {
        Category::Attitudes
    }

    fn convert(&self, spec: &FieldSpec, value: &RawValue) -> Option<ResponseValue> {
        likert_response(value, spec.ordinal_scale(), AGREEMENT_SCALE)
    }
}
