//! Flat CSV layout of harmonized responses:
//! `id, year, <category>.<field>..., computed.<score>...`.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::catalogue::{ValueKind, CATALOGUE};
use crate::error::{PipelineError, Result};
use crate::model::{CompositeScores, FairMaturityLevel, ProcessedResponse, ResponseValue};

pub fn csv_headers() -> Vec<String> {
    let mut headers = vec!["id".to_string(), "year".to_string()];
    headers.extend(CATALOGUE.iter().map(|spec| spec.semantic_id()));
    headers.extend(CompositeScores::COLUMNS.iter().map(|c| c.to_string()));
    headers
}

pub fn write_responses<W: Write>(writer: W, responses: &[ProcessedResponse]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(csv_headers())?;

    for response in responses {
        let mut record: Vec<String> = Vec::with_capacity(CATALOGUE.len() + 7);
        record.push(response.id.clone());
        record.push(response.year.to_string());
        for spec in CATALOGUE {
            record.push(
                response
                    .value(spec.category, spec.id)
                    .map(ResponseValue::render)
                    .unwrap_or_default(),
            );
        }
        let computed = &response.computed;
        let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        record.push(number(computed.overall_attitude_score));
        record.push(number(computed.overall_motivation_score));
        record.push(number(computed.overall_barrier_score));
        record.push(
            computed
                .fair_maturity_level
                .map(|level| level.as_str().to_string())
                .unwrap_or_default(),
        );
        record.push(number(computed.institutional_support_score));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_responses_csv(path: &Path, responses: &[ProcessedResponse]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_responses(file, responses)
}

/// Parses the layout written by [`write_responses`]. Raw rows are not part of
/// the CSV, so read-back responses carry an empty snapshot.
pub fn read_responses<R: Read>(reader: R) -> Result<Vec<ProcessedResponse>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let id_idx = position("id")
        .ok_or_else(|| PipelineError::InvalidValue("CSV is missing the id column".to_string()))?;
    let year_idx = position("year")
        .ok_or_else(|| PipelineError::InvalidValue("CSV is missing the year column".to_string()))?;
    let field_columns: Vec<_> = CATALOGUE
        .iter()
        .filter_map(|spec| position(&spec.semantic_id()).map(|idx| (spec, idx)))
        .collect();
    let composite_idx: Vec<Option<usize>> = CompositeScores::COLUMNS.iter().map(|c| position(c)).collect();

    let mut responses = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).map(str::trim).filter(|v| !v.is_empty());
        let optional = |idx: Option<usize>| idx.and_then(cell);

        let id = cell(id_idx)
            .ok_or_else(|| PipelineError::InvalidValue(format!("row {} has no id", row + 2)))?;
        let year = cell(year_idx)
            .and_then(|v| v.parse::<i32>().ok())
            .ok_or_else(|| PipelineError::InvalidValue(format!("row {} has no valid year", row + 2)))?;

        let mut response = ProcessedResponse::new(id, year, Arc::default());
        for (spec, idx) in &field_columns {
            if let Some(text) = cell(*idx) {
                response
                    .category_mut(spec.category)
                    .insert(spec.id.to_string(), parse_cell(spec.category.value_kind(), text));
            }
        }

        let score = |slot: usize| optional(composite_idx[slot]).and_then(|v| v.parse::<f64>().ok());
        response.computed = CompositeScores {
            overall_attitude_score: score(0),
            overall_motivation_score: score(1),
            overall_barrier_score: score(2),
            fair_maturity_level: optional(composite_idx[3]).and_then(FairMaturityLevel::parse),
            institutional_support_score: score(4),
        };

        responses.push(response);
    }

    Ok(responses)
}

pub fn read_responses_csv(path: &Path) -> Result<Vec<ProcessedResponse>> {
    let file = std::fs::File::open(path)?;
    read_responses(file)
}

fn parse_cell(kind: ValueKind, text: &str) -> ResponseValue {
    match kind {
        ValueKind::Likert => text
            .parse::<i64>()
            .map(ResponseValue::Integer)
            .or_else(|_| text.parse::<f64>().map(ResponseValue::Decimal))
            .unwrap_or_else(|_| ResponseValue::Text(text.to_string())),
        ValueKind::Boolean => match text {
            "true" => ResponseValue::Boolean(true),
            "false" => ResponseValue::Boolean(false),
            other => ResponseValue::Text(other.to_string()),
        },
        ValueKind::Text => ResponseValue::Text(text.to_string()),
    }
}
