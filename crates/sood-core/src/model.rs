use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sood_loader::RawRow;

use crate::catalogue::{self, Category};
use crate::config::ImputationScope;
use crate::question_mapper::QuestionMapping;

/// A typed value held in a category map. Untagged so that exported JSON reads
/// as plain numbers, booleans and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl ResponseValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ResponseValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResponseValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ResponseValue::Integer(value) => Some(*value as f64),
            ResponseValue::Decimal(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Text form used for CSV cells and value histograms.
    pub fn render(&self) -> String {
        match self {
            ResponseValue::Boolean(value) => value.to_string(),
            ResponseValue::Integer(value) => value.to_string(),
            ResponseValue::Decimal(value) => value.to_string(),
            ResponseValue::Text(value) => value.clone(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ResponseValue::Boolean(_) => "boolean",
            ResponseValue::Integer(_) => "integer",
            ResponseValue::Decimal(_) => "decimal",
            ResponseValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub type CategoryValues = BTreeMap<String, ResponseValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedResponse {
    pub id: String,
    pub year: i32,
    #[serde(default)]
    pub demographics: CategoryValues,
    #[serde(default)]
    pub attitudes: CategoryValues,
    #[serde(default)]
    pub motivations: CategoryValues,
    #[serde(default)]
    pub barriers: CategoryValues,
    #[serde(default)]
    pub fair_awareness: CategoryValues,
    #[serde(default)]
    pub institutional_support: CategoryValues,
    #[serde(default, skip_serializing_if = "CompositeScores::is_empty")]
    pub computed: CompositeScores,
    #[serde(default)]
    pub raw_row: Arc<RawRow>,
}

impl ProcessedResponse {
    pub fn new(id: impl Into<String>, year: i32, raw_row: Arc<RawRow>) -> Self {
        Self {
            id: id.into(),
            year,
            demographics: CategoryValues::new(),
            attitudes: CategoryValues::new(),
            motivations: CategoryValues::new(),
            barriers: CategoryValues::new(),
            fair_awareness: CategoryValues::new(),
            institutional_support: CategoryValues::new(),
            computed: CompositeScores::default(),
            raw_row,
        }
    }

    pub fn category(&self, category: Category) -> &CategoryValues {
        match category {
            Category::Demographics => &self.demographics,
            Category::Attitudes => &self.attitudes,
            Category::Motivations => &self.motivations,
            Category::Barriers => &self.barriers,
            Category::FairAwareness => &self.fair_awareness,
            Category::InstitutionalSupport => &self.institutional_support,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut CategoryValues {
        match category {
            Category::Demographics => &mut self.demographics,
            Category::Attitudes => &mut self.attitudes,
            Category::Motivations => &mut self.motivations,
            Category::Barriers => &mut self.barriers,
            Category::FairAwareness => &mut self.fair_awareness,
            Category::InstitutionalSupport => &mut self.institutional_support,
        }
    }

    pub fn value(&self, category: Category, field: &str) -> Option<&ResponseValue> {
        self.category(category).get(field)
    }

    pub fn has_any_values(&self) -> bool {
        Category::ALL
            .iter()
            .any(|category| !self.category(*category).is_empty())
    }

    /// Fraction of catalogue fields that hold a value.
    pub fn completeness(&self) -> f64 {
        let expected = catalogue::total_field_count();
        if expected == 0 {
            return 0.0;
        }
        let present = catalogue::CATALOGUE
            .iter()
            .filter(|spec| self.value(spec.category, spec.id).is_some())
            .count();
        present as f64 / expected as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FairMaturityLevel {
    Novice,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl FairMaturityLevel {
    pub const ALL: [FairMaturityLevel; 5] = [
        FairMaturityLevel::Novice,
        FairMaturityLevel::Beginner,
        FairMaturityLevel::Intermediate,
        FairMaturityLevel::Advanced,
        FairMaturityLevel::Expert,
    ];

    pub fn from_mean(mean: f64) -> Self {
        if mean < 1.5 {
            FairMaturityLevel::Novice
        } else if mean < 2.5 {
            FairMaturityLevel::Beginner
        } else if mean < 3.5 {
            FairMaturityLevel::Intermediate
        } else if mean < 4.5 {
            FairMaturityLevel::Advanced
        } else {
            FairMaturityLevel::Expert
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FairMaturityLevel::Novice => "Novice",
            FairMaturityLevel::Beginner => "Beginner",
            FairMaturityLevel::Intermediate => "Intermediate",
            FairMaturityLevel::Advanced => "Advanced",
            FairMaturityLevel::Expert => "Expert",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for FairMaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores derived by the harmonizer after imputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_attitude_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_motivation_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_barrier_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fair_maturity_level: Option<FairMaturityLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institutional_support_score: Option<f64>,
}

impl CompositeScores {
    pub const COLUMNS: [&'static str; 5] = [
        "computed.overallAttitudeScore",
        "computed.overallMotivationScore",
        "computed.overallBarrierScore",
        "computed.fairMaturityLevel",
        "computed.institutionalSupportScore",
    ];

    pub fn is_empty(&self) -> bool {
        self.overall_attitude_score.is_none()
            && self.overall_motivation_score.is_none()
            && self.overall_barrier_score.is_none()
            && self.fair_maturity_level.is_none()
            && self.institutional_support_score.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn from_years(years: impl IntoIterator<Item = i32>) -> Option<Self> {
        let mut iter = years.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), year| (lo.min(year), hi.max(year)));
        Some(Self { start, end })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub total_responses: usize,
    pub year_range: Option<YearRange>,
    pub completeness_score: f64,
    pub source_files: Vec<String>,
    pub processed_at: DateTime<Utc>,
    #[serde(default)]
    pub imputation_scope: ImputationScope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    pub field: String,
    pub category: String,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub missing: usize,
    pub missing_rate: f64,
    pub unique_values: usize,
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub total_responses: usize,
    pub valid_responses: usize,
    pub invalid_responses: usize,
    pub low_completeness_responses: usize,
    pub average_completeness: f64,
    /// Keyed by `category.field`.
    pub field_stats: BTreeMap<String, FieldStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonizedDataset {
    pub responses: Vec<ProcessedResponse>,
    pub metadata: DatasetMetadata,
    pub question_mappings: Vec<QuestionMapping>,
    #[serde(default)]
    pub processing_stats: BTreeMap<i32, ProcessingStats>,
}

impl HarmonizedDataset {
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.responses.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn responses_for_year(&self, year: i32) -> impl Iterator<Item = &ProcessedResponse> {
        self.responses.iter().filter(move |r| r.year == year)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
