//! # graphdict CLI Entry Point
//!
//! Loads definition documents, builds the dictionary, and either validates
//! it or exports it.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use graphdict::config::{Config, Overrides};
use graphdict::export::tree::{json_tree, JsonLevel};
use graphdict::{export, load_dictionary, load_formats, validate, LoadOutcome};

const EXIT_FAILED: u8 = 1;
const EXIT_EXPORT_FAILED: u8 = 3;
const EXIT_VALIDATE_FAILED: u8 = 4;
const EXIT_JSON_TREE_FAILED: u8 = 5;

/// graphdict: generate graphs from YAML definition files.
///
/// Define data in YAML, then validate it and turn it into a graph
/// representation that models the relationships between definitions.
#[derive(Parser, Debug)]
#[command(name = "graphdict", version, about)]
struct Cli {
    /// Configuration file; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source directory to read definitions from (repeatable).
    #[arg(short = 's', long = "source", global = true)]
    sources: Vec<PathBuf>,

    /// File extension for definitions.
    #[arg(short = 'e', long = "ext", global = true)]
    extension: Option<String>,

    /// Deepest SubDefinitions level to merge.
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence.
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate definition files.
    Validate {
        /// Definition format file (repeatable); classes may be declared once.
        #[arg(short = 'f', long = "format")]
        formats: Vec<PathBuf>,
    },
    /// Export the merged dictionary.
    Export {
        #[arg(long, value_enum, default_value_t = ExportTarget::Cypher)]
        to: ExportTarget,

        /// JSON tree level configuration (required for `--to json-tree`).
        #[arg(short = 'j', long = "json", required_if_eq("to", "json-tree"))]
        tree_config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportTarget {
    Cypher,
    Json,
    JsonTree,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_FAILED);
        }
    };

    match cli.command {
        Commands::Validate { .. } => run_validate(&config),
        Commands::Export { to, tree_config } => match run_export(&config, to, tree_config.as_deref()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("{e:#}");
                match to {
                    ExportTarget::JsonTree => ExitCode::from(EXIT_JSON_TREE_FAILED),
                    ExportTarget::Cypher | ExportTarget::Json => ExitCode::from(EXIT_EXPORT_FAILED),
                }
            }
        },
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("could not load configuration [{}]", path.display()))?,
        None => Config::default(),
    };
    let formats = match &cli.command {
        Commands::Validate { formats } => formats.clone(),
        Commands::Export { .. } => Vec::new(),
    };
    let config = base.override_with(Overrides {
        sources: cli.sources.clone(),
        extension: cli.extension.clone(),
        formats,
        max_depth: cli.max_depth,
    })?;
    Ok(config)
}

fn load(config: &Config) -> LoadOutcome {
    let outcome = load_dictionary(&config.sources, config.extension(), config.build_options());
    tracing::info!(
        documents = outcome.loaded,
        skipped = outcome.skipped.len(),
        records = outcome.dictionary.len(),
        references = outcome.dictionary.reference_count(),
        "dictionary built"
    );
    outcome
}

fn run_validate(config: &Config) -> ExitCode {
    let format = if config.formats.is_empty() {
        None
    } else {
        match load_formats(&config.formats) {
            Ok(format) => Some(format),
            Err(e) => {
                tracing::error!(error = %e, "could not build definition format");
                println!("failed to build definition format");
                return ExitCode::from(EXIT_VALIDATE_FAILED);
            }
        }
    };

    let LoadOutcome { dictionary, mut report, .. } = load(config);
    report.absorb(validate(&dictionary, format.as_ref()));

    if report.is_clean() {
        println!("successfully validated definitions");
        ExitCode::SUCCESS
    } else {
        println!("failed to validate definitions ({} issue(s))", report.count());
        ExitCode::from(EXIT_VALIDATE_FAILED)
    }
}

fn run_export(config: &Config, to: ExportTarget, tree_config: Option<&Path>) -> anyhow::Result<()> {
    let levels = match (to, tree_config) {
        (ExportTarget::JsonTree, Some(path)) => vec![JsonLevel::from_file(path)
            .with_context(|| format!("could not load JSON configuration [{}]", path.display()))?],
        (ExportTarget::JsonTree, None) => anyhow::bail!("--json is required for the json-tree export"),
        _ => Vec::new(),
    };

    let outcome = load(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match to {
        ExportTarget::Cypher => export::cypher_script(&outcome.dictionary, &mut out)
            .context("could not write Cypher export")?,
        ExportTarget::Json => {
            let json = export::to_json(&outcome.dictionary).context("could not serialize dictionary")?;
            writeln!(out, "{json}")?;
        }
        ExportTarget::JsonTree => {
            let tree = json_tree(&outcome.dictionary, &levels).context("could not build JSON tree")?;
            writeln!(out, "{}", tree.to_json()?)?;
        }
    }
    out.flush()?;
    Ok(())
}
