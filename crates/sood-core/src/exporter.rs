use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::csv_schema::write_responses_csv;
use crate::error::Result;
use crate::model::{HarmonizedDataset, ProcessedResponse};
use crate::report::render_validation_report;
use crate::summary::summarize;
use crate::validator::ValidationResult;

/// Paths of everything written by one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportArtifacts {
    pub complete_csv: PathBuf,
    pub complete_json: PathBuf,
    pub summary_json: PathBuf,
    pub validation_report: PathBuf,
    pub yearly_csv: Vec<(i32, PathBuf)>,
}

impl ExportArtifacts {
    pub fn all_paths(&self) -> Vec<&Path> {
        let mut paths = vec![
            self.complete_csv.as_path(),
            self.complete_json.as_path(),
            self.summary_json.as_path(),
            self.validation_report.as_path(),
        ];
        paths.extend(self.yearly_csv.iter().map(|(_, path)| path.as_path()));
        paths
    }
}

#[derive(Debug, Clone)]
pub struct Exporter {
    prefix: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new("sood")
    }
}

impl Exporter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn path(&self, output_dir: &Path, suffix: &str) -> PathBuf {
        output_dir.join(format!("{}_{}", self.prefix, suffix))
    }

    pub fn export_complete(
        &self,
        dataset: &HarmonizedDataset,
        validation: &ValidationResult,
        output_dir: &Path,
    ) -> Result<ExportArtifacts> {
        fs::create_dir_all(output_dir)?;

        let mut artifacts = ExportArtifacts {
            complete_csv: self.path(output_dir, "processed_complete.csv"),
            complete_json: self.path(output_dir, "processed_complete.json"),
            summary_json: self.path(output_dir, "summary_statistics.json"),
            validation_report: self.path(output_dir, "validation_report.md"),
            yearly_csv: Vec::new(),
        };

        write_responses_csv(&artifacts.complete_csv, &dataset.responses)?;

        let json = serde_json::to_string_pretty(dataset)?;
        fs::write(&artifacts.complete_json, json)?;

        let summary = summarize(dataset)?;
        fs::write(&artifacts.summary_json, serde_json::to_string_pretty(&summary)?)?;

        let report = render_validation_report(dataset, validation, &summary)?;
        fs::write(&artifacts.validation_report, report)?;

        for year in dataset.years() {
            let path = self.path(output_dir, &format!("{year}_processed.csv"));
            let responses: Vec<ProcessedResponse> =
                dataset.responses_for_year(year).cloned().collect();
            write_responses_csv(&path, &responses)?;
            artifacts.yearly_csv.push((year, path));
        }

        info!(
            output_dir = %output_dir.display(),
            files = artifacts.all_paths().len(),
            "export complete"
        );

        Ok(artifacts)
    }
}
