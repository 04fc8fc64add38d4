use std::fmt::{self, Write};

use crate::catalogue::Category;
use crate::error::Result;
use crate::model::HarmonizedDataset;
use crate::summary::{field_trend, SummaryStatistics};
use crate::validator::ValidationResult;

const MAX_LISTED_ERRORS: usize = 50;

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Markdown report of a validation run over a harmonized dataset.
pub fn render_validation_report(
    dataset: &HarmonizedDataset,
    validation: &ValidationResult,
    summary: &SummaryStatistics,
) -> Result<String> {
    let mut out = String::new();
    write_validation_report(&mut out, dataset, validation, summary)?;
    Ok(out)
}

pub fn write_validation_report<W: Write>(
    out: &mut W,
    dataset: &HarmonizedDataset,
    validation: &ValidationResult,
    summary: &SummaryStatistics,
) -> fmt::Result {
    let meta = &dataset.metadata;

    writeln!(out, "# State of Open Data Survey Validation Report\n")?;
    writeln!(out, "Generated: {}\n", meta.processed_at.to_rfc3339())?;

    writeln!(out, "## Overview\n")?;
    writeln!(
        out,
        "- Status: **{}**",
        if validation.is_valid { "VALID" } else { "INVALID" }
    )?;
    writeln!(out, "- Total responses: {}", meta.total_responses)?;
    if let Some(range) = meta.year_range {
        writeln!(out, "- Year range: {}-{}", range.start, range.end)?;
    }
    writeln!(out, "- Completeness score: {}", percent(validation.completeness_score))?;
    writeln!(out, "- Imputation scope: {}", meta.imputation_scope)?;
    writeln!(out, "- Source files: {}\n", meta.source_files.join(", "))?;

    writeln!(out, "## Errors ({})\n", validation.errors.len())?;
    if validation.errors.is_empty() {
        writeln!(out, "None.\n")?;
    } else {
        for error in validation.errors.iter().take(MAX_LISTED_ERRORS) {
            writeln!(out, "- {error}")?;
        }
        if validation.errors.len() > MAX_LISTED_ERRORS {
            writeln!(
                out,
                "- ... and {} more",
                validation.errors.len() - MAX_LISTED_ERRORS
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Warnings ({})\n", validation.warnings.len())?;
    if validation.warnings.is_empty() {
        writeln!(out, "None.\n")?;
    } else {
        for warning in &validation.warnings {
            writeln!(out, "- {warning}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Responses by Year\n")?;
    writeln!(out, "| Year | Responses | Valid | Invalid | Low completeness | Avg completeness |")?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for (year, stats) in &validation.year_stats {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            year,
            stats.total_responses,
            stats.valid_responses,
            stats.invalid_responses,
            stats.low_completeness_responses,
            percent(stats.average_completeness)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Field Completeness\n")?;
    writeln!(out, "| Field | Valid | Invalid | Missing | Missing rate | Unique | Most common |")?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for (id, field) in &validation.stats.field_stats {
        let top = field
            .top_values
            .first()
            .map(|entry| format!("{} ({})", entry.value, entry.count))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            id,
            field.valid,
            field.invalid,
            field.missing,
            percent(field.missing_rate),
            field.unique_values,
            top
        )?;
    }
    writeln!(out)?;

    let trend_fields: Vec<_> = dataset
        .question_mappings
        .iter()
        .filter(|m| m.category == Category::Attitudes && m.years_available().len() >= 3)
        .collect();
    if !trend_fields.is_empty() && !summary.by_year.is_empty() {
        writeln!(out, "## Attitude Trends\n")?;
        let years: Vec<i32> = summary.by_year.keys().copied().collect();
        let header: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        writeln!(out, "| Question | {} |", header.join(" | "))?;
        writeln!(out, "|---|{}", "---|".repeat(years.len()))?;
        for mapping in trend_fields {
            let cells: Vec<String> = field_trend(summary, mapping.category, &mapping.field)
                .into_iter()
                .map(|(_, mean)| mean.map(|m| format!("{m:.2}")).unwrap_or_else(|| "-".to_string()))
                .collect();
            writeln!(out, "| {} | {} |", mapping.semantic_id, cells.join(" | "))?;
        }
        writeln!(out)?;
    }

    Ok(())
}
