use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use sood_core::{
    HarmonizedDataset, HarmonizerConfig, ImputationScope, Processor, Validator,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "State of Open Data survey harmonizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, harmonize, validate and export every configured survey year
    Run(RunArgs),
    /// Show what each source file contains and how its headers map
    Inspect(SourceArgs),
    /// Re-validate a previously exported complete JSON dataset
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding the yearly exports
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Directory the artifacts are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Imputation scope: global, per-year or per-discipline
    #[arg(long)]
    imputation: Option<ImputationScope>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to a `*_processed_complete.json` file
    dataset: PathBuf,
    /// TOML configuration file supplying validation thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Inspect(args) => handle_inspect(args),
        Command::Validate(args) => handle_validate(args),
    }
}

/// File (or defaults), then environment, then command-line flags.
fn resolve_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<HarmonizerConfig> {
    let mut config = match path {
        Some(path) => HarmonizerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => HarmonizerConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

fn handle_run(args: RunArgs) -> Result<()> {
    let mut config = resolve_config(args.source.config.as_deref(), args.source.data_dir)?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(scope) = args.imputation {
        config.imputation.scope = scope;
    }

    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        sources = config.sources.len(),
        imputation = %config.imputation.scope,
        "starting harmonization run"
    );

    let outcome = Processor::new(config)
        .run()
        .context("harmonization pipeline failed")?;

    let dataset = &outcome.dataset;
    info!(
        responses = dataset.metadata.total_responses,
        years = ?dataset.years(),
        completeness = outcome.validation.completeness_score,
        imputed = outcome.imputation.total_imputed(),
        valid = outcome.validation.is_valid,
        "harmonization finished"
    );

    println!(
        "Processed {} responses across {} years.",
        dataset.metadata.total_responses,
        dataset.years().len()
    );
    println!(
        "Validation: {} ({} errors, {} warnings)",
        if outcome.validation.is_valid { "valid" } else { "INVALID" },
        outcome.validation.errors.len(),
        outcome.validation.warnings.len()
    );
    for path in outcome.artifacts.all_paths() {
        println!("  wrote {}", path.display());
    }

    Ok(())
}

fn handle_inspect(args: SourceArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), args.data_dir)?;
    let processor = Processor::new(config);
    let tables = processor
        .load_sources()
        .context("no survey sources could be loaded")?;
    let mapper = Processor::build_mapper(&tables);

    let mut overview = Table::new();
    overview.set_header(vec![
        "Year", "File", "Format", "Rows", "Skipped", "Headers", "Mapped", "Unmapped",
    ]);
    for table in &tables {
        let mapped = table
            .headers
            .iter()
            .filter(|header| mapper.find_best_match(header, table.year).is_some())
            .count();
        overview.add_row(vec![
            table.year.to_string(),
            table.source_file.clone(),
            table.source_kind.to_string(),
            table.row_count().to_string(),
            table.skipped_rows.len().to_string(),
            table.headers.len().to_string(),
            mapped.to_string(),
            (table.headers.len() - mapped).to_string(),
        ]);
    }
    println!("{overview}");

    for table in &tables {
        let mut matches = Table::new();
        matches.set_header(vec!["Header", "Field"]);
        for header in &table.headers {
            let field = mapper
                .find_best_match(header, table.year)
                .map(|mapping| mapping.semantic_id.clone())
                .unwrap_or_else(|| "-".to_string());
            matches.add_row(vec![header.clone(), field]);
        }
        println!("\n{} ({})", table.source_file, table.year);
        println!("{matches}");
    }

    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), None)?;
    let content = std::fs::read_to_string(&args.dataset)
        .with_context(|| format!("failed to read {}", args.dataset.display()))?;
    let dataset: HarmonizedDataset = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a harmonized dataset", args.dataset.display()))?;

    let result = Validator::new(config.validation).validate(&dataset.responses);

    println!(
        "{} responses, completeness {:.1}%",
        dataset.responses.len(),
        result.completeness_score * 100.0
    );
    for warning in &result.warnings {
        warn!(warning = %warning, "validation warning");
        println!("warning: {warning}");
    }
    for problem in &result.errors {
        println!("error: {problem}");
    }

    if !result.is_valid {
        bail!("dataset failed validation with {} errors", result.errors.len());
    }
    println!("Dataset is valid.");
    Ok(())
}
