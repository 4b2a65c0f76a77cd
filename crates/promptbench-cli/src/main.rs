//! promptbench - LLM prompt benchmark driver
//!
//! Runs the fixed ten-case coding battery against Claude on Amazon Bedrock,
//! one request at a time, then writes a JSON report and prints a summary.
//!
//! Everything is configured through the environment, so a plain
//! `promptbench` with no arguments is the normal invocation:
//!
//! - `AWS_PROFILE` / `AWS_REGION`: credentials profile and Bedrock region
//! - `PROMPTBENCH_MODEL`: model or inference profile id
//! - `PROMPTBENCH_RESULTS_DIR` / `PROMPTBENCH_SAMPLE_DIR`: output and fixture locations
//! - `PROMPTBENCH_VERBOSE` / `PROMPTBENCH_LOG_JSON`: debug logging, JSON log lines

mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::Parser;
use tracing::Level;

use promptbench_core::backend::bedrock::DEFAULT_MODEL_ID;
use promptbench_core::config::{
    DEFAULT_AWS_PROFILE, DEFAULT_AWS_REGION, DEFAULT_RESULTS_DIR, DEFAULT_SAMPLE_DIR,
};
use promptbench_core::{
    obs, run_suite, standard_catalog, AwsCredentials, BedrockBackend, EngineSettings,
    HarnessConfig, ModelBackend,
};

use console::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "promptbench")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Benchmark an LLM backend on a fixed coding prompt battery", long_about = None)]
struct Cli {
    /// AWS shared-credentials profile
    #[arg(long, env = "AWS_PROFILE", default_value = DEFAULT_AWS_PROFILE)]
    profile: String,

    /// Bedrock region
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_AWS_REGION)]
    region: String,

    /// Model or inference profile id
    #[arg(long, env = "PROMPTBENCH_MODEL", default_value = DEFAULT_MODEL_ID)]
    model: String,

    /// Directory the JSON report is written to
    #[arg(long, env = "PROMPTBENCH_RESULTS_DIR", default_value = DEFAULT_RESULTS_DIR)]
    results_dir: PathBuf,

    /// Directory holding the sample source fixtures
    #[arg(long, env = "PROMPTBENCH_SAMPLE_DIR", default_value = DEFAULT_SAMPLE_DIR)]
    sample_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, env = "PROMPTBENCH_VERBOSE", value_parser = BoolishValueParser::new())]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, env = "PROMPTBENCH_LOG_JSON", value_parser = BoolishValueParser::new())]
    json: bool,
}

impl Cli {
    fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            aws_profile: self.profile.clone(),
            aws_region: self.region.clone(),
            model_id: self.model.clone(),
            results_dir: self.results_dir.clone(),
            sample_dir: self.sample_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    promptbench_core::init_tracing(cli.json, level);

    let config = cli.harness_config();
    config.validate().context("Invalid configuration")?;

    println!("\nInitialising Bedrock client...");
    println!("Using AWS Profile: {}", config.aws_profile);
    println!("Using AWS Region: {}", config.aws_region);

    let credentials = AwsCredentials::resolve(&config.aws_profile)
        .context("Failed to resolve AWS credentials")?;
    let backend = BedrockBackend::new(config.bedrock_config(), credentials)
        .context("Failed to create Bedrock client")?;

    let cases = standard_catalog(&config.sample_dir).context("Failed to load test fixtures")?;

    console::print_banner(backend.label(), backend.model_id());
    println!("Starting tests...");

    let log = run_suite(
        &backend,
        &cases,
        &EngineSettings::default(),
        &mut ConsoleProgress,
    )
    .await;

    let output_path = config.report_path();
    log.persist(&output_path)
        .with_context(|| format!("Failed to save results to {}", output_path.display()))?;
    obs::emit_report_persisted(&output_path, log.len());
    println!("\nResults saved to: {}", output_path.display());

    print!(
        "{}",
        console::render_summary(backend.label(), log.results(), &log.summarize())
    );

    Ok(())
}
