// Strata verification CLI
// Runs the CHAR/VARCHAR round-trip matrix and inspects its inputs

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strata_core::{CompressionType, StrataConfig};
use strata_verify::{codepoint_count, run_matrix, HarnessOptions, InputCorpus, ScenarioMatrix};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "strata-verify")]
#[command(about = "Codepoint-accurate CHAR/VARCHAR round-trip verification for strata files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scenario in the matrix (default)
    Run(RunArgs),

    /// Print the scenario matrix
    List,

    /// Print the input corpus with codepoint and byte counts
    Corpus,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Configuration file (JSON, TOML or YAML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory for scenario artifacts
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Rows per batch
    #[arg(long)]
    capacity: Option<usize>,

    /// Block compression (none, lz4, zstd, snappy)
    #[arg(long)]
    compression: Option<CompressionType>,

    /// Output format
    #[arg(long, short, value_enum)]
    format: Option<OutputFormat>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            if !run(args)? {
                std::process::exit(1);
            }
        }
        Commands::List => list(),
        Commands::Corpus => corpus(),
    }

    Ok(())
}

fn load_config(args: &RunArgs) -> anyhow::Result<StrataConfig> {
    let mut config = match &args.config {
        Some(path) => StrataConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => StrataConfig::default(),
    };
    config.apply_env();

    if let Some(work_dir) = &args.work_dir {
        config.storage.work_dir = work_dir.clone();
    }
    if let Some(capacity) = args.capacity {
        config.batch.capacity = capacity;
    }
    if let Some(compression) = args.compression {
        config.storage.compression = compression;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_logging(config: &StrataConfig) -> anyhow::Result<()> {
    let level: tracing::Level = config
        .logging
        .level
        .parse()
        .with_context(|| format!("invalid log level '{}'", config.logging.level))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(config.logging.with_target)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Returns whether every scenario passed
fn run(args: RunArgs) -> anyhow::Result<bool> {
    let config = load_config(&args)?;
    init_logging(&config)?;
    debug!("configuration: {:?}", config);

    let options = HarnessOptions::from_config(&config);
    let matrix = ScenarioMatrix::standard();
    let corpus = InputCorpus::standard();
    info!(
        "Running {} scenarios over {} values in {}",
        matrix.len(),
        corpus.len(),
        options.work_dir.display()
    );

    let report = run_matrix(&matrix, &corpus, &options);
    match args.format.unwrap_or_default() {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(report.is_success())
}

fn list() {
    let matrix = ScenarioMatrix::standard();
    println!("{:<16} {:<8} {:>10} {:>6}", "SCENARIO", "KIND", "MAX_LENGTH", "TRIM");
    for case in &matrix {
        println!(
            "{:<16} {:<8} {:>10} {:>6}",
            case.name(),
            case.kind,
            case.max_length,
            case.trim
        );
    }
    println!("{} scenarios", matrix.len());
}

fn corpus() {
    let corpus = InputCorpus::standard();
    println!("{:>5} {:>10} {:>6}  VALUE", "INDEX", "CODEPOINTS", "BYTES");
    for (index, value) in corpus.iter().enumerate() {
        match value {
            Some(s) => println!("{:>5} {:>10} {:>6}  {}", index, codepoint_count(s), s.len(), s),
            None => println!("{:>5} {:>10} {:>6}  <null>", index, "-", "-"),
        }
    }
}
