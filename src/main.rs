//! bias-probe CLI - Data generation for bias probing
//!
//! Queries a language model with every pending prompt, validates each short
//! categorical answer, retries once with a corrective turn and persists the
//! final answer per item. Interrupted runs resume where they stopped:
//!
//! 1. Config: YAML run file plus `BIAS_PROBE__*` environment overrides
//! 2. Store: per-item response files (`template`) or a response column (`ibe`/`ebe`)
//! 3. Model: OpenAI chat completions or a local Ollama server
//! 4. Run: sequential query/validate/refine loop, then a summary report

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use secrecy::ExposeSecret;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

use bias_probe::adapters::ai::{OllamaConfig, OllamaProvider, OpenAIConfig, OpenAIProvider};
use bias_probe::adapters::storage::{DirectoryDataSource, TableDataSource};
use bias_probe::application::{
    GenerateResponsesCommand, GenerateResponsesHandler, GenerationReport,
};
use bias_probe::config::{AppConfig, ModelProvider, ValidationError, OPENAI_API_KEY_ENV};
use bias_probe::domain::generation::{
    AcceptanceVocabulary, BanglaNormalizer, ChatPromptBuilder, ResponseClassifier,
};
use bias_probe::ports::{AIProvider, DataSource};

/// Generate validated model answers for bias-probing prompts
///
/// Examples:
///   bias-probe --config config.yaml                       # All pending items
///   bias-probe --config config_ibe.yaml --datahandler ibe # Response column store
///   bias-probe --total 10 --calculate-cost                # Ten items, priced
#[derive(Parser, Debug)]
#[command(name = "bias-probe")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Path to the YAML run file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Number of pending items to process; negative processes all
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    total: i64,

    /// Price token usage and log the running cost
    #[arg(long, alias = "calculate_cost")]
    calculate_cost: bool,

    /// Where answers are stored
    #[arg(long, value_enum, default_value_t = DataHandler::Template)]
    datahandler: DataHandler,

    /// Directory for the per-run log file
    #[arg(long, default_value = "./logs")]
    log_dir: PathBuf,
}

/// Store selection, named after the task layouts it serves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DataHandler {
    /// One response file per item and model
    Template,
    /// Response column for the four-option task
    Ibe,
    /// Response column for the two-option task
    Ebe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = init_logging(&cli.log_dir)?;

    let config = AppConfig::load_validated(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    tracing::info!(
        model = %config.model,
        provider = ?config.provider,
        datahandler = ?cli.datahandler,
        template_version = %config.template_version,
        response_processor_version = %config.response_processor_version,
        "Starting data generation"
    );

    let command = command_from(&cli);

    let report = match config.provider {
        ModelProvider::OpenAI => {
            let key = config
                .ai
                .resolve_openai_key()
                .ok_or(ValidationError::MissingRequired(OPENAI_API_KEY_ENV))?;
            let mut openai = OpenAIConfig::new(key.expose_secret().clone())
                .with_model(&config.model)
                .with_base_url(&config.ai.openai_base_url);
            if let Some(timeout) = config.ai.timeout() {
                openai = openai.with_timeout(timeout);
            }
            let provider = OpenAIProvider::new(openai)?;
            run_with_store(provider, cli.datahandler, &config, command).await?
        }
        ModelProvider::Ollama => {
            let mut ollama =
                OllamaConfig::new(&config.model).with_base_url(&config.ai.ollama_base_url);
            if let Some(timeout) = config.ai.timeout() {
                ollama = ollama.with_timeout(timeout);
            }
            let provider = OllamaProvider::new(ollama)?;
            run_with_store(provider, cli.datahandler, &config, command).await?
        }
    };

    println!("{}", report);
    println!("Log file: {}", log_path.display());
    Ok(())
}

fn command_from(cli: &Cli) -> GenerateResponsesCommand {
    let mut command = GenerateResponsesCommand::new();
    if let Ok(limit) = usize::try_from(cli.total) {
        command = command.with_limit(limit);
    }
    if cli.calculate_cost {
        command = command.with_cost_tracking();
    }
    command
}

/// Pairs the provider with the selected store and runs the handler.
async fn run_with_store<A>(
    provider: A,
    datahandler: DataHandler,
    config: &AppConfig,
    command: GenerateResponsesCommand,
) -> Result<GenerationReport>
where
    A: AIProvider + 'static,
{
    match datahandler {
        DataHandler::Template => {
            let source = DirectoryDataSource::new(
                &config.prompt_data_path,
                config.storage_folder()?,
                &config.model,
            );
            run(source, provider, config, command).await
        }
        DataHandler::Ibe | DataHandler::Ebe => {
            let source = TableDataSource::new(&config.prompt_data_path, config.storage_table()?);
            run(source, provider, config, command).await
        }
    }
}

async fn run<D, A>(
    source: D,
    provider: A,
    config: &AppConfig,
    command: GenerateResponsesCommand,
) -> Result<GenerationReport>
where
    D: DataSource + 'static,
    A: AIProvider + 'static,
{
    let normalizer = Arc::new(BanglaNormalizer::new());
    let vocabulary =
        AcceptanceVocabulary::for_variant(config.response_variant()?, normalizer.as_ref());
    let classifier = ResponseClassifier::new(vocabulary, normalizer);
    let prompt_builder = ChatPromptBuilder::new(config.prompt_variant()?);

    let handler = GenerateResponsesHandler::new(
        Arc::new(source),
        Arc::new(provider),
        Arc::new(prompt_builder),
        classifier,
    )
    .with_sampling(config.sampling.into());

    Ok(handler.handle(command).await?)
}

/// Routes tracing output to `<log_dir>/data_generation_<timestamp>.log`.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
fn init_logging(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let path = log_dir.join(log_file_name(chrono::Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(path)
}

fn log_file_name<Tz>(now: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let sanitized: String = stamp
        .chars()
        .map(|c| if matches!(c, ' ' | ':' | '-') { '_' } else { c })
        .collect();
    format!("data_generation_{}.log", sanitized)
}
