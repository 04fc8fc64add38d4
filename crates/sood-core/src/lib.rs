pub mod catalogue;
pub mod config;
pub mod csv_schema;
pub mod error;
pub mod exporter;
pub mod extractors;
pub mod harmonizer;
pub mod model;
pub mod processor;
pub mod question_mapper;
pub mod report;
pub mod summary;
pub mod validator;

pub use config::{HarmonizerConfig, ImputationScope, SourceConfig, ValidationThresholds};
pub use error::{PipelineError, Result};
pub use exporter::{ExportArtifacts, Exporter};
pub use harmonizer::{HarmonizationResult, Harmonizer, ImputationStats};
pub use model::{HarmonizedDataset, ProcessedResponse, ResponseValue};
pub use processor::{ProcessingOutcome, Processor};
pub use question_mapper::{QuestionMapper, QuestionMapping};
pub use validator::{ValidationResult, Validator};
