use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalogue::{Category, ValueKind, CATALOGUE};
use crate::config::ValidationThresholds;
use crate::model::{FieldStats, ProcessedResponse, ProcessingStats, ResponseValue, ValueCount};

const TOP_VALUE_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ProcessingStats,
    pub year_stats: BTreeMap<i32, ProcessingStats>,
    pub completeness_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    thresholds: ValidationThresholds,
}

impl Validator {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn validate(&self, responses: &[ProcessedResponse]) -> ValidationResult {
        let mut result = ValidationResult::default();

        if responses.is_empty() {
            result.errors.push("Dataset contains no responses".to_string());
            warn!("validation failed: dataset is empty");
            return result;
        }

        if let Some(warning) = year_gap_warning(responses) {
            result.warnings.push(warning);
        }

        let invalid = self.check_records(responses, &mut result.errors);

        let indexed: Vec<(usize, &ProcessedResponse)> = responses.iter().enumerate().collect();
        result.stats = self.build_stats(&indexed, &invalid);
        let mut by_year: BTreeMap<i32, Vec<(usize, &ProcessedResponse)>> = BTreeMap::new();
        for (idx, response) in &indexed {
            by_year.entry(response.year).or_default().push((*idx, *response));
        }
        result.year_stats = by_year
            .into_iter()
            .map(|(year, group)| (year, self.build_stats(&group, &invalid)))
            .collect();
        result.completeness_score = result.stats.average_completeness;

        let total = responses.len() as f64;
        let invalid_ratio = result.stats.invalid_responses as f64 / total;
        if invalid_ratio > self.thresholds.max_invalid_ratio {
            result.warnings.push(format!(
                "High invalid response rate: {:.1}% of responses failed validation",
                invalid_ratio * 100.0
            ));
        }

        let low_ratio = result.stats.low_completeness_responses as f64 / total;
        if low_ratio > self.thresholds.max_low_completeness_ratio {
            result.warnings.push(format!(
                "High proportion of low-completeness responses: {:.1}% below {:.0}% completeness",
                low_ratio * 100.0,
                self.thresholds.low_completeness_threshold * 100.0
            ));
        }

        if result.completeness_score < self.thresholds.min_completeness_score {
            result.warnings.push(format!(
                "Low overall completeness score: {:.1}%",
                result.completeness_score * 100.0
            ));
        }

        result.is_valid = result.errors.is_empty();

        info!(
            responses = responses.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            completeness = result.completeness_score,
            "validation complete"
        );

        result
    }

    /// Records type/range errors and duplicate ids. Returns the indices of
    /// invalid responses.
    fn check_records(
        &self,
        responses: &[ProcessedResponse],
        errors: &mut Vec<String>,
    ) -> HashSet<usize> {
        let mut invalid = HashSet::new();
        let mut seen_ids: HashSet<(i32, &str)> = HashSet::new();

        for (idx, response) in responses.iter().enumerate() {
            if !seen_ids.insert((response.year, response.id.as_str())) {
                errors.push(format!(
                    "Duplicate response id {} in {}",
                    response.id, response.year
                ));
                invalid.insert(idx);
            }

            for category in Category::ALL {
                for (field, value) in response.category(category) {
                    if let Err(problem) = check_value(category, value) {
                        errors.push(format!(
                            "Response {} ({}): {}.{} {}",
                            response.id,
                            response.year,
                            category.key(),
                            field,
                            problem
                        ));
                        invalid.insert(idx);
                    }
                }
            }
        }

        invalid
    }

    fn build_stats(
        &self,
        responses: &[(usize, &ProcessedResponse)],
        invalid: &HashSet<usize>,
    ) -> ProcessingStats {
        let total = responses.len();
        let mut stats = ProcessingStats {
            total_responses: total,
            ..ProcessingStats::default()
        };
        if total == 0 {
            return stats;
        }

        stats.invalid_responses = responses
            .iter()
            .filter(|(idx, _)| invalid.contains(idx))
            .count();
        stats.valid_responses = total - stats.invalid_responses;

        let mut completeness_sum = 0.0;
        for (_, response) in responses {
            let completeness = response.completeness();
            completeness_sum += completeness;
            if completeness < self.thresholds.low_completeness_threshold {
                stats.low_completeness_responses += 1;
            }
        }
        stats.average_completeness = completeness_sum / total as f64;

        for spec in CATALOGUE {
            let mut field = FieldStats {
                field: spec.id.to_string(),
                category: spec.category.key().to_string(),
                total,
                ..FieldStats::default()
            };
            let mut counts: HashMap<String, usize> = HashMap::new();

            for (_, response) in responses {
                match response.value(spec.category, spec.id) {
                    None => field.missing += 1,
                    Some(value) => {
                        if check_value(spec.category, value).is_ok() {
                            field.valid += 1;
                        } else {
                            field.invalid += 1;
                        }
                        *counts.entry(value.render()).or_default() += 1;
                    }
                }
            }

            field.missing_rate = field.missing as f64 / total as f64;
            field.unique_values = counts.len();
            field.top_values = top_values(counts);
            stats.field_stats.insert(spec.semantic_id(), field);
        }

        stats
    }
}

fn check_value(category: Category, value: &ResponseValue) -> Result<(), String> {
    match (category.value_kind(), value) {
        (ValueKind::Likert, ResponseValue::Integer(point)) if (1..=5).contains(point) => Ok(()),
        (ValueKind::Likert, ResponseValue::Integer(point)) => {
            Err(format!("has out-of-range value {point} (expected 1-5)"))
        }
        (ValueKind::Likert, other) => Err(format!(
            "has {} value '{}' (expected integer 1-5)",
            other.type_name(),
            other.render()
        )),
        (ValueKind::Boolean, ResponseValue::Boolean(_)) => Ok(()),
        (ValueKind::Boolean, other) => Err(format!(
            "has {} value '{}' (expected boolean)",
            other.type_name(),
            other.render()
        )),
        (ValueKind::Text, ResponseValue::Text(_)) => Ok(()),
        (ValueKind::Text, other) => Err(format!(
            "has {} value '{}' (expected text)",
            other.type_name(),
            other.render()
        )),
    }
}

fn top_values(counts: HashMap<String, usize>) -> Vec<ValueCount> {
    let mut entries: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    entries.truncate(TOP_VALUE_LIMIT);
    entries
}

/// `"Missing data for years: 2018, 2019"` when the observed years have holes.
pub fn year_gap_warning(responses: &[ProcessedResponse]) -> Option<String> {
    let years: BTreeSet<i32> = responses.iter().map(|r| r.year).collect();
    let (first, last) = (*years.first()?, *years.last()?);
    let missing: Vec<String> = (first..=last)
        .filter(|year| !years.contains(year))
        .map(|year| year.to_string())
        .collect();
    (!missing.is_empty()).then(|| format!("Missing data for years: {}", missing.join(", ")))
}
