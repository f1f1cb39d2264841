//! formscope-export - CLI tool to export form responses
//!
//! Loads a form schema and its submissions from JSON files and writes the
//! responses as CSV or JSON rows, with values resolved through the same key
//! heuristics the analytics use.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use formscope_core::export::{export_rows, to_csv, to_json};
use formscope_core::{Config, FormSchema, SubmissionRecord};

#[derive(Parser)]
#[command(name = "formscope-export")]
#[command(about = "Export form responses as CSV or JSON rows")]
#[command(version)]
struct Args {
    /// Form schema JSON file
    #[arg(short, long)]
    schema: PathBuf,

    /// Submissions JSON file (array of submission records)
    #[arg(long)]
    submissions: PathBuf,

    /// Output format: csv (default) or json
    #[arg(short, long, default_value = "csv")]
    format: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Omit the leading submission-timestamp column
    #[arg(long)]
    no_timestamp: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        formscope_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let schema: FormSchema = load_json(&args.schema, "schema")?;
    let submissions: Vec<SubmissionRecord> = load_json(&args.submissions, "submissions")?;

    if submissions.is_empty() {
        eprintln!("No submissions found for form '{}'", schema.title);
    }

    let mut export_config = config.export.clone();
    if args.no_timestamp {
        export_config.include_timestamp = false;
    }

    let table = export_rows(&schema, &submissions, &export_config);

    let rendered = match args.format.as_str() {
        "csv" => to_csv(&table),
        "json" => serde_json::to_string_pretty(&to_json(&table))?,
        other => anyhow::bail!("unsupported format: {} (expected csv or json)", other),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes())
                .with_context(|| format!("failed to write output file {}", path.display()))?;
            println!(
                "Exported {} response(s) to {}",
                table.rows.len(),
                path.display()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {} file {}", what, path.display()))
}
