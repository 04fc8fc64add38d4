use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalogue::{Category, ValueKind, CATALOGUE};
use crate::error::Result;
use crate::model::{round2, FairMaturityLevel, HarmonizedDataset, ProcessedResponse, ResponseValue};

const ATTITUDE_SCORE: &str = "computed.overallAttitudeScore";
const MOTIVATION_SCORE: &str = "computed.overallMotivationScore";
const BARRIER_SCORE: &str = "computed.overallBarrierScore";
const FAIR_MATURITY: &str = "computed.fairMaturityLevel";
const SUPPORT_SCORE: &str = "computed.institutionalSupportScore";

/// Aggregate view of one slice of the dataset (all responses, or one year).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub responses: usize,
    /// Mean scale point per `category.field`; `None` when nobody answered.
    pub field_means: BTreeMap<String, Option<f64>>,
    /// Percentage of `true` answers per institutional-support field.
    pub institutional_percentages: BTreeMap<String, Option<f64>>,
    pub composite_means: BTreeMap<String, Option<f64>>,
    pub fair_maturity_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub generated_at: DateTime<Utc>,
    pub total_responses: usize,
    pub years: Vec<i32>,
    pub overall: GroupSummary,
    pub by_year: BTreeMap<i32, GroupSummary>,
}

/// One row per response: `id`, `year`, every catalogue field under its
/// semantic id (scale points as Float64, flags as Boolean, demographics as
/// String) and the composite scores.
pub fn responses_frame(responses: &[ProcessedResponse]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(CATALOGUE.len() + 7);

    columns.push(
        Series::new(
            "id".into(),
            responses.iter().map(|r| r.id.as_str()).collect::<Vec<&str>>(),
        )
        .into(),
    );
    columns.push(Series::new("year".into(), responses.iter().map(|r| r.year).collect::<Vec<i32>>()).into());

    for spec in CATALOGUE {
        let name: PlSmallStr = spec.semantic_id().into();
        let values = responses.iter().map(|r| r.value(spec.category, spec.id));
        let series = match spec.category.value_kind() {
            ValueKind::Likert => Series::new(
                name,
                values
                    .map(|v| v.and_then(ResponseValue::as_f64))
                    .collect::<Vec<Option<f64>>>(),
            ),
            ValueKind::Boolean => Series::new(
                name,
                values
                    .map(|v| v.and_then(ResponseValue::as_bool))
                    .collect::<Vec<Option<bool>>>(),
            ),
            ValueKind::Text => Series::new(
                name,
                values
                    .map(|v| v.and_then(ResponseValue::as_text))
                    .collect::<Vec<Option<&str>>>(),
            ),
        };
        columns.push(series.into());
    }

    let scores: [(&str, fn(&ProcessedResponse) -> Option<f64>); 4] = [
        (ATTITUDE_SCORE, |r| r.computed.overall_attitude_score),
        (MOTIVATION_SCORE, |r| r.computed.overall_motivation_score),
        (BARRIER_SCORE, |r| r.computed.overall_barrier_score),
        (SUPPORT_SCORE, |r| r.computed.institutional_support_score),
    ];
    for (name, score) in scores {
        columns.push(
            Series::new(name.into(), responses.iter().map(score).collect::<Vec<Option<f64>>>()).into(),
        );
    }
    columns.push(
        Series::new(
            FAIR_MATURITY.into(),
            responses
                .iter()
                .map(|r| r.computed.fair_maturity_level.map(|level| level.as_str()))
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
    );

    Ok(DataFrame::new(columns)?)
}

pub fn summarize(dataset: &HarmonizedDataset) -> Result<SummaryStatistics> {
    let df = responses_frame(&dataset.responses)?;
    let years = dataset.years();

    let overall = summarize_frame(&df)?;
    let mut by_year = BTreeMap::new();
    for year in &years {
        let mask = df.column("year")?.i32()?.equal(*year);
        let year_df = df.filter(&mask)?;
        by_year.insert(*year, summarize_frame(&year_df)?);
    }

    Ok(SummaryStatistics {
        generated_at: Utc::now(),
        total_responses: dataset.responses.len(),
        years,
        overall,
        by_year,
    })
}

fn summarize_frame(df: &DataFrame) -> Result<GroupSummary> {
    let likert: Vec<String> = semantic_ids(ValueKind::Likert);
    let flags: Vec<String> = semantic_ids(ValueKind::Boolean);
    let composites = [ATTITUDE_SCORE, MOTIVATION_SCORE, BARRIER_SCORE, SUPPORT_SCORE];

    let mut exprs: Vec<Expr> = Vec::new();
    for name in &likert {
        exprs.push(col(name.as_str()).mean().alias(name.as_str()));
    }
    for name in &flags {
        exprs.push(
            (col(name.as_str()).cast(DataType::Float64).mean() * lit(100.0)).alias(name.as_str()),
        );
    }
    for name in composites {
        exprs.push(col(name).mean().alias(name));
    }

    let means = df.clone().lazy().select(exprs).collect()?;
    let read = |name: &str| -> Result<Option<f64>> {
        Ok(means.column(name)?.f64()?.get(0).map(round2))
    };

    let mut summary = GroupSummary {
        responses: df.height(),
        ..GroupSummary::default()
    };
    for name in &likert {
        summary.field_means.insert(name.clone(), read(name)?);
    }
    for name in &flags {
        summary.institutional_percentages.insert(name.clone(), read(name)?);
    }
    for name in composites {
        summary.composite_means.insert(name.to_string(), read(name)?);
    }

    for level in FairMaturityLevel::ALL {
        summary
            .fair_maturity_distribution
            .insert(level.as_str().to_string(), 0);
    }
    for level in df.column(FAIR_MATURITY)?.str()?.into_iter().flatten() {
        *summary
            .fair_maturity_distribution
            .entry(level.to_string())
            .or_default() += 1;
    }

    Ok(summary)
}

fn semantic_ids(kind: ValueKind) -> Vec<String> {
    CATALOGUE
        .iter()
        .filter(|spec| spec.category.value_kind() == kind)
        .map(|spec| spec.semantic_id())
        .collect()
}

/// Mean of one Likert field for one category across the summary's years,
/// handy for trend tables.
pub fn field_trend(summary: &SummaryStatistics, category: Category, field: &str) -> Vec<(i32, Option<f64>)> {
    let key = format!("{}.{}", category.key(), field);
    summary
        .by_year
        .iter()
        .map(|(year, group)| (*year, group.field_means.get(&key).copied().flatten()))
        .collect()
}
