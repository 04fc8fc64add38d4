use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use chrono::Utc;
use sood_loader::{load_source_file, year_from_filename, RawRow, RawYearTable};
use tracing::{debug, error, info, warn};

use crate::config::{HarmonizerConfig, SourceConfig};
use crate::error::{PipelineError, Result};
use crate::exporter::{ExportArtifacts, Exporter};
use crate::extractors::extract_all;
use crate::harmonizer::{HarmonizationResult, Harmonizer, ImputationStats};
use crate::model::{DatasetMetadata, HarmonizedDataset, ProcessedResponse, YearRange};
use crate::question_mapper::QuestionMapper;
use crate::validator::{ValidationResult, Validator};

const ID_COLUMNS: [&str; 4] = ["ResponseId", "Response ID", "Respondent ID", "id"];

#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub dataset: HarmonizedDataset,
    pub validation: ValidationResult,
    pub imputation: ImputationStats,
    pub artifacts: ExportArtifacts,
}

/// Sequences load -> extract -> harmonize -> validate -> export. Every stage
/// consumes the whole collection before the next one starts.
pub struct Processor {
    config: HarmonizerConfig,
}

impl Processor {
    pub fn new(config: HarmonizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarmonizerConfig {
        &self.config
    }

    /// Loads every configured source. Files that cannot be read are logged and
    /// skipped; the run only fails when nothing loads at all.
    pub fn load_sources(&self) -> Result<Vec<RawYearTable>> {
        let mut tables = Vec::new();

        for source in &self.config.sources {
            match load_one(&self.config.data_dir, source) {
                Ok(table) => {
                    for skipped in &table.skipped_rows {
                        warn!(
                            file = %table.source_file,
                            line = skipped.line,
                            reason = %skipped.reason,
                            "skipping malformed row"
                        );
                    }
                    info!(
                        file = %table.source_file,
                        year = table.year,
                        kind = %table.source_kind,
                        rows = table.row_count(),
                        "loaded source"
                    );
                    tables.push(table);
                }
                Err(err) => {
                    warn!(file = %source.file, error = %err, "skipping source that failed to load");
                }
            }
        }

        if tables.is_empty() {
            return Err(PipelineError::NoSourcesLoaded(
                self.config.data_dir.display().to_string(),
            ));
        }
        Ok(tables)
    }

    /// Catalogue mappings plus whatever the loaded headers reveal.
    pub fn build_mapper(tables: &[RawYearTable]) -> QuestionMapper {
        let mut mapper = QuestionMapper::seeded();
        for table in tables {
            let discovered = mapper.observe(table.year, &table.headers);
            debug!(year = table.year, file = %table.source_file, discovered, "scanned headers");
        }
        mapper
    }

    pub fn extract(&self, tables: &[RawYearTable], mapper: &QuestionMapper) -> Vec<ProcessedResponse> {
        let mut responses: Vec<ProcessedResponse> = Vec::new();

        for table in tables {
            let mut used_ids: HashSet<String> = responses
                .iter()
                .filter(|r| r.year == table.year)
                .map(|r| r.id.clone())
                .collect();
            let mut extracted = 0usize;

            for (idx, row) in table.rows.iter().enumerate() {
                let row_number = idx + 1;
                let mut response = ProcessedResponse::new(
                    unique_id(response_id(row, table.year, row_number), &mut used_ids),
                    table.year,
                    row.clone(),
                );
                for (category, values) in extract_all(row, table.year, mapper) {
                    *response.category_mut(category) = values;
                }

                if !response.has_any_values() {
                    error!(
                        file = %table.source_file,
                        year = table.year,
                        row = row_number,
                        "row mapped to no survey fields; skipping"
                    );
                    continue;
                }

                extracted += 1;
                responses.push(response);
            }

            info!(file = %table.source_file, year = table.year, responses = extracted, "extracted responses");
        }

        responses
    }

    pub fn build_dataset(
        &self,
        tables: &[RawYearTable],
        harmonized: HarmonizationResult,
        mapper: &QuestionMapper,
    ) -> HarmonizedDataset {
        let responses = harmonized.responses;
        let completeness_score = if responses.is_empty() {
            0.0
        } else {
            responses.iter().map(ProcessedResponse::completeness).sum::<f64>() / responses.len() as f64
        };

        let source_files: BTreeSet<String> = tables.iter().map(|t| t.source_file.clone()).collect();

        HarmonizedDataset {
            metadata: DatasetMetadata {
                total_responses: responses.len(),
                year_range: YearRange::from_years(responses.iter().map(|r| r.year)),
                completeness_score,
                source_files: source_files.into_iter().collect(),
                processed_at: Utc::now(),
                imputation_scope: self.config.imputation.scope,
            },
            responses,
            question_mappings: mapper.mappings().to_vec(),
            processing_stats: Default::default(),
        }
    }

    /// Everything but the export.
    pub fn process(&self) -> Result<(HarmonizedDataset, ValidationResult, ImputationStats)> {
        let tables = self.load_sources()?;
        let mapper = Self::build_mapper(&tables);
        let responses = self.extract(&tables, &mapper);

        let harmonized = Harmonizer::new(self.config.imputation.scope).harmonize(responses);
        let imputation = harmonized.stats.clone();
        let mut dataset = self.build_dataset(&tables, harmonized, &mapper);

        let validation = Validator::new(self.config.validation.clone()).validate(&dataset.responses);
        for problem in &validation.errors {
            error!(problem = %problem, "validation error");
        }
        for warning in &validation.warnings {
            warn!(warning = %warning, "validation warning");
        }
        dataset.processing_stats = validation.year_stats.clone();
        dataset.metadata.completeness_score = validation.completeness_score;

        Ok((dataset, validation, imputation))
    }

    pub fn run(&self) -> Result<ProcessingOutcome> {
        let (dataset, validation, imputation) = self.process()?;
        let artifacts = Exporter::new(self.config.output_prefix.clone()).export_complete(
            &dataset,
            &validation,
            &self.config.output_dir,
        )?;

        Ok(ProcessingOutcome {
            dataset,
            validation,
            imputation,
            artifacts,
        })
    }
}

fn load_one(data_dir: &Path, source: &SourceConfig) -> Result<RawYearTable> {
    let year = match source.year {
        Some(year) => year,
        None => year_from_filename(&source.file)?,
    };
    Ok(load_source_file(&data_dir.join(&source.file), year)?)
}

fn response_id(row: &RawRow, year: i32, row_number: usize) -> String {
    ID_COLUMNS
        .iter()
        .find_map(|column| row.non_empty(column).and_then(|v| v.as_text()))
        .map(|id| id.into_owned())
        .unwrap_or_else(|| format!("{year}_{row_number:05}"))
}

fn unique_id(candidate: String, used: &mut HashSet<String>) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }
    let mut suffix = 2;
    loop {
        let attempt = format!("{candidate}-{suffix}");
        if used.insert(attempt.clone()) {
            return attempt;
        }
        suffix += 1;
    }
}
