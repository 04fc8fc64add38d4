use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

pub const DATA_DIR_ENV: &str = "SOOD_DATA_DIR";
pub const OUTPUT_DIR_ENV: &str = "SOOD_OUTPUT_DIR";

/// Which responses a median/mode is computed over before it fills a gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationScope {
    #[default]
    Global,
    PerYear,
    PerDiscipline,
}

impl ImputationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImputationScope::Global => "global",
            ImputationScope::PerYear => "per_year",
            ImputationScope::PerDiscipline => "per_discipline",
        }
    }
}

impl fmt::Display for ImputationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImputationScope {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "global" => Ok(ImputationScope::Global),
            "per_year" | "year" => Ok(ImputationScope::PerYear),
            "per_discipline" | "discipline" => Ok(ImputationScope::PerDiscipline),
            other => Err(PipelineError::InvalidValue(format!(
                "unknown imputation scope '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    /// Overrides the year derived from the file name.
    #[serde(default)]
    pub year: Option<i32>,
}

impl SourceConfig {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            year: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputationConfig {
    pub scope: ImputationScope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    pub max_invalid_ratio: f64,
    pub max_low_completeness_ratio: f64,
    /// A response below this completeness counts as low-completeness.
    pub low_completeness_threshold: f64,
    pub min_completeness_score: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            max_invalid_ratio: 0.10,
            max_low_completeness_ratio: 0.20,
            low_completeness_threshold: 0.25,
            min_completeness_score: 0.50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizerConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    pub sources: Vec<SourceConfig>,
    pub imputation: ImputationConfig,
    pub validation: ValidationThresholds,
}

impl Default for HarmonizerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            output_prefix: "sood".to_string(),
            sources: default_sources(),
            imputation: ImputationConfig::default(),
            validation: ValidationThresholds::default(),
        }
    }
}

/// The yearly exports as published.
pub fn default_sources() -> Vec<SourceConfig> {
    [
        "SOOD_2017_survey_responses.xlsx",
        "SOOD_2018_survey_responses.xlsx",
        "Open_Data_Survey_raw_responses.xlsx",
        "SOOD_2020_survey_responses.tsv",
        "SOOD_2021_survey_responses.xlsx",
        "State_of_Open_Data_full_dataset.xlsx",
        "SOOD_2023_survey_responses.tsv",
        "SOOD_2024_survey_responses.xlsx",
    ]
    .into_iter()
    .map(SourceConfig::new)
    .collect()
}

impl HarmonizerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HarmonizerConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `SOOD_DATA_DIR` and `SOOD_OUTPUT_DIR` replace the configured directories.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
    }

    fn check(&self) -> Result<()> {
        if self.output_prefix.trim().is_empty() {
            return Err(PipelineError::InvalidValue(
                "output_prefix must not be empty".to_string(),
            ));
        }
        let thresholds = [
            ("max_invalid_ratio", self.validation.max_invalid_ratio),
            ("max_low_completeness_ratio", self.validation.max_low_completeness_ratio),
            ("low_completeness_threshold", self.validation.low_completeness_threshold),
            ("min_completeness_score", self.validation.min_completeness_score),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::InvalidValue(format!(
                    "validation.{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}
