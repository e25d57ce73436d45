mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mdlint_core::{Config, ValidationReport};
use mdlint_engine::{sync_records, DirectoryScanner, DocumentValidator, JsonFileStore};

use crate::render::{display_path, generate_markdown_report, print_report_summary};

/// md-data-lint - Validate Markdown frontmatter against a schema
#[derive(Parser)]
#[command(name = "md-data-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing Markdown files
    directory: PathBuf,

    /// Path to schema definition file (JSON, or YAML by extension)
    #[arg(short, long)]
    schema: PathBuf,

    /// Glob patterns for matching files (repeatable, default: **/*.md)
    #[arg(short, long = "pattern")]
    pattern: Vec<String>,

    /// Glob patterns to exclude (repeatable)
    #[arg(short, long = "exclude")]
    exclude: Vec<String>,

    /// Path to config file (default: mdlint.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads used for validation
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Fail on unknown field types in the schema instead of treating them as strings
    #[arg(long)]
    strict_types: bool,

    /// Write the JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a Markdown report to this file
    #[arg(short, long)]
    markdown: Option<PathBuf>,

    /// Sync valid documents into a JSON record store at this path
    #[arg(long)]
    sync: Option<PathBuf>,

    /// Only print the summary counts
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(all_valid) => {
            if !all_valid {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    dotenvy::dotenv().ok();

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new("mdlint.toml").exists() {
        Config::from_file(Path::new("mdlint.toml")).context("Failed to load mdlint.toml")?
    } else {
        tracing::debug!("No config file found, using defaults");
        Config::default()
    };

    if !cli.pattern.is_empty() {
        config.scan.patterns = cli.pattern.clone();
    }
    if !cli.exclude.is_empty() {
        config.scan.exclude.extend(cli.exclude.iter().cloned());
    }
    if let Some(jobs) = cli.jobs {
        config.scan.jobs = jobs.max(1);
    }
    if cli.strict_types {
        config.schema.strict_types = true;
    }

    Ok(config)
}

/// Load, scan, report; returns whether every file was valid
fn run(cli: &Cli) -> Result<bool> {
    let config = load_config(cli)?;

    let validator = DocumentValidator::from_schema_file(&cli.schema, config.schema.strict_types)
        .context("Error loading schema")?;

    if !cli.quiet {
        println!(
            "Loaded {} schema definitions from {}",
            validator.catalog().len(),
            cli.schema.display()
        );
    }

    let results = DirectoryScanner::with_config(&validator, config.scan.clone())
        .scan(&cli.directory)
        .with_context(|| format!("Failed to scan {}", cli.directory.display()))?;

    let report = ValidationReport::summarize(results).with_timestamp();

    print_report_summary(&report, cli.quiet);

    if let Some(output) = &cli.output {
        report
            .save_to_file(output)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
        tracing::info!("Report saved to {}", output.display());
    }

    if let Some(md_path) = &cli.markdown {
        std::fs::write(md_path, generate_markdown_report(&report))
            .with_context(|| format!("Failed to write markdown report to {}", md_path.display()))?;
        tracing::info!("Markdown report saved to {}", md_path.display());
    }

    if let Some(store_path) = &cli.sync {
        sync_command(&report, store_path, cli.quiet)?;
    }

    Ok(!report.has_errors())
}

/// Mirror valid documents into the record store
fn sync_command(report: &ValidationReport, store_path: &Path, quiet: bool) -> Result<()> {
    let mut store = JsonFileStore::open(store_path)?;
    let summary = sync_records(&report.results, &mut store)?;
    store.save()?;

    if !quiet {
        println!();
        println!(
            "{} {}/{} valid files. Deleted {} stale records.",
            "Synced".green(),
            summary.upserted,
            report.summary.total,
            summary.removed
        );
        for path in &summary.failed {
            println!("  {} {}", "Failed to process".red(), display_path(path));
        }
    }

    Ok(())
}
