use std::collections::BTreeMap;

use serde::Serialize;
use sood_loader::RawValue;
use tracing::{debug, info};

use crate::catalogue::{Category, ImputationPolicy, ValueKind, CATALOGUE};
use crate::config::ImputationScope;
use crate::extractors::{boolean_value, standardize_demographic};
use crate::model::{
    round2, CategoryValues, CompositeScores, FairMaturityLevel, ProcessedResponse, ResponseValue,
};

pub const GLOBAL_GROUP: &str = "all";
const UNSPECIFIED_DISCIPLINE: &str = "unspecified";

/// Statistics used to fill gaps, keyed by imputation group and then by
/// `category.field`. The `all` group is always present and backs every other.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImputationStats {
    pub medians: BTreeMap<String, BTreeMap<String, i64>>,
    pub modes: BTreeMap<String, BTreeMap<String, bool>>,
    pub imputed_counts: BTreeMap<String, usize>,
}

impl ImputationStats {
    pub fn median(&self, group: &str, semantic_id: &str) -> Option<i64> {
        lookup(&self.medians, group, semantic_id)
    }

    pub fn mode(&self, group: &str, semantic_id: &str) -> Option<bool> {
        lookup(&self.modes, group, semantic_id)
    }

    pub fn total_imputed(&self) -> usize {
        self.imputed_counts.values().sum()
    }
}

fn lookup<T: Copy>(
    table: &BTreeMap<String, BTreeMap<String, T>>,
    group: &str,
    semantic_id: &str,
) -> Option<T> {
    table
        .get(group)
        .and_then(|fields| fields.get(semantic_id))
        .or_else(|| {
            table
                .get(GLOBAL_GROUP)
                .and_then(|fields| fields.get(semantic_id))
        })
        .copied()
}

#[derive(Debug, Clone)]
pub struct HarmonizationResult {
    pub responses: Vec<ProcessedResponse>,
    pub stats: ImputationStats,
}

/// Whole-collection second pass: normalize, impute, then derive composites.
#[derive(Debug, Clone, Default)]
pub struct Harmonizer {
    scope: ImputationScope,
}

impl Harmonizer {
    pub fn new(scope: ImputationScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> ImputationScope {
        self.scope
    }

    pub fn harmonize(&self, responses: Vec<ProcessedResponse>) -> HarmonizationResult {
        let normalized: Vec<ProcessedResponse> =
            responses.into_iter().map(normalize_response).collect();

        let mut stats = self.compute_statistics(&normalized);

        let mut harmonized: Vec<ProcessedResponse> = normalized
            .into_iter()
            .map(|response| self.impute(response, &mut stats))
            .collect();

        for response in &mut harmonized {
            response.computed = composite_scores(response);
        }

        info!(
            responses = harmonized.len(),
            scope = %self.scope,
            imputed = stats.total_imputed(),
            "harmonization complete"
        );

        HarmonizationResult {
            responses: harmonized,
            stats,
        }
    }

    fn group_key(&self, response: &ProcessedResponse) -> String {
        match self.scope {
            ImputationScope::Global => GLOBAL_GROUP.to_string(),
            ImputationScope::PerYear => response.year.to_string(),
            ImputationScope::PerDiscipline => response
                .demographics
                .get("researchArea")
                .and_then(ResponseValue::as_text)
                .map(str::to_string)
                .unwrap_or_else(|| UNSPECIFIED_DISCIPLINE.to_string()),
        }
    }

    fn compute_statistics(&self, responses: &[ProcessedResponse]) -> ImputationStats {
        let mut numeric: BTreeMap<String, BTreeMap<String, Vec<i64>>> = BTreeMap::new();
        let mut flags: BTreeMap<String, BTreeMap<String, (usize, usize)>> = BTreeMap::new();

        for response in responses {
            let mut groups = vec![GLOBAL_GROUP.to_string()];
            let key = self.group_key(response);
            if key != GLOBAL_GROUP {
                groups.push(key);
            }

            for spec in CATALOGUE {
                let Some(value) = response.value(spec.category, spec.id) else {
                    continue;
                };
                match spec.category.imputation_policy() {
                    ImputationPolicy::Median => {
                        if let Some(point) = value.as_integer() {
                            for group in &groups {
                                numeric
                                    .entry(group.clone())
                                    .or_default()
                                    .entry(spec.semantic_id())
                                    .or_default()
                                    .push(point);
                            }
                        }
                    }
                    ImputationPolicy::Mode => {
                        if let Some(flag) = value.as_bool() {
                            for group in &groups {
                                let counts = flags
                                    .entry(group.clone())
                                    .or_default()
                                    .entry(spec.semantic_id())
                                    .or_default();
                                if flag {
                                    counts.0 += 1;
                                } else {
                                    counts.1 += 1;
                                }
                            }
                        }
                    }
                    ImputationPolicy::Preserve => {}
                }
            }
        }

        let medians = numeric
            .into_iter()
            .map(|(group, fields)| {
                let fields = fields
                    .into_iter()
                    .filter_map(|(id, values)| median(values).map(|m| (id, m)))
                    .collect();
                (group, fields)
            })
            .collect();

        let modes = flags
            .into_iter()
            .map(|(group, fields)| {
                let fields = fields
                    .into_iter()
                    .map(|(id, (true_count, false_count))| (id, true_count > false_count))
                    .collect();
                (group, fields)
            })
            .collect();

        ImputationStats {
            medians,
            modes,
            imputed_counts: BTreeMap::new(),
        }
    }

    fn impute(&self, mut response: ProcessedResponse, stats: &mut ImputationStats) -> ProcessedResponse {
        let group = self.group_key(&response);

        for spec in CATALOGUE {
            if response.value(spec.category, spec.id).is_some() {
                continue;
            }
            let semantic_id = spec.semantic_id();
            let filled = match spec.category.imputation_policy() {
                ImputationPolicy::Median => stats
                    .median(&group, &semantic_id)
                    .map(ResponseValue::Integer),
                ImputationPolicy::Mode => stats.mode(&group, &semantic_id).map(ResponseValue::Boolean),
                ImputationPolicy::Preserve => None,
            };
            if let Some(value) = filled {
                response
                    .category_mut(spec.category)
                    .insert(spec.id.to_string(), value);
                *stats.imputed_counts.entry(semantic_id).or_default() += 1;
            }
        }

        response
    }
}

/// Median of scale points; an even count averages the middle pair and rounds.
pub fn median(mut values: Vec<i64>) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some(((values[mid - 1] + values[mid]) as f64 / 2.0).round() as i64)
    }
}

fn normalize_response(mut response: ProcessedResponse) -> ProcessedResponse {
    for category in Category::ALL {
        let values = std::mem::take(response.category_mut(category));
        let normalized: CategoryValues = values
            .into_iter()
            .filter_map(|(field, value)| {
                let converted = normalize_value(category, &field, value);
                if converted.is_none() {
                    debug!(id = %response.id, category = %category, field = %field, "dropping unreadable value");
                }
                converted.map(|v| (field, v))
            })
            .collect();
        *response.category_mut(category) = normalized;
    }
    response
}

fn normalize_value(category: Category, field: &str, value: ResponseValue) -> Option<ResponseValue> {
    match category.value_kind() {
        ValueKind::Likert => {
            let number = match &value {
                ResponseValue::Integer(n) => Some(*n as f64),
                ResponseValue::Decimal(f) => Some(*f),
                ResponseValue::Text(t) => t.trim().parse::<f64>().ok(),
                ResponseValue::Boolean(_) => None,
            }?;
            if !number.is_finite() {
                return None;
            }
            Some(ResponseValue::Integer(number.round().clamp(1.0, 5.0) as i64))
        }
        ValueKind::Boolean => match value {
            ResponseValue::Boolean(flag) => Some(ResponseValue::Boolean(flag)),
            ResponseValue::Integer(n) => Some(ResponseValue::Boolean(n > 0)),
            ResponseValue::Decimal(f) => Some(ResponseValue::Boolean(f > 0.0)),
            ResponseValue::Text(t) => boolean_value(&RawValue::Text(t)).map(ResponseValue::Boolean),
        },
        ValueKind::Text => standardize_demographic(field, &value.render()).map(ResponseValue::Text),
    }
}

fn mean(values: &CategoryValues) -> Option<f64> {
    let points: Vec<f64> = values.values().filter_map(ResponseValue::as_f64).collect();
    if points.is_empty() {
        return None;
    }
    Some(points.iter().sum::<f64>() / points.len() as f64)
}

pub fn composite_scores(response: &ProcessedResponse) -> CompositeScores {
    let flags: Vec<bool> = response
        .institutional_support
        .values()
        .filter_map(ResponseValue::as_bool)
        .collect();
    let institutional_support_score = (!flags.is_empty()).then(|| {
        let supported = flags.iter().filter(|flag| **flag).count();
        round2(supported as f64 / flags.len() as f64 * 100.0)
    });

    CompositeScores {
        overall_attitude_score: mean(&response.attitudes).map(round2),
        overall_motivation_score: mean(&response.motivations).map(round2),
        overall_barrier_score: mean(&response.barriers).map(round2),
        fair_maturity_level: mean(&response.fair_awareness).map(FairMaturityLevel::from_mean),
        institutional_support_score,
    }
}
