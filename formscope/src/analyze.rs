//! formscope-analyze - CLI tool to compute response analytics for forms
//!
//! Plays the role of the surrounding system: loads the form schema,
//! submission records, and view data from JSON files (the record-store
//! stand-in), runs the aggregation engine, and prints the statistics.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use formscope_core::analytics::{
    list_metrics, AggregationEngine, DashboardStatistics, FieldBreakdown, FormStatistics,
};
use formscope_core::{format, Config, FormSchema, FormSummary, SubmissionRecord, ViewSource};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "formscope-analyze")]
#[command(about = "Compute response analytics for job-application forms")]
#[command(version)]
struct Args {
    /// Form schema JSON file (per-form mode)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Form summaries JSON file (dashboard mode: array of {id, created_at})
    #[arg(long)]
    forms: Option<PathBuf>,

    /// Submissions JSON file (array of submission records)
    #[arg(long)]
    submissions: Option<PathBuf>,

    /// View events JSON file (array of {form_id, timestamp})
    #[arg(long)]
    views: Option<PathBuf>,

    /// Pre-aggregated view count, used when no events file is available
    #[arg(long)]
    view_count: Option<u64>,

    /// List the metrics the engine produces without computing anything
    #[arg(long)]
    list_metrics: bool,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        formscope_core::logging::init(&config.logging).context("failed to initialize logging")?;

    // List metrics mode
    if args.list_metrics {
        println!("Metrics produced by the aggregation engine:");
        for metric in list_metrics() {
            println!(
                "  [{}] {} ({}): {}",
                metric.scope,
                metric.name,
                metric.value_type.as_str(),
                metric.summary
            );
        }
        return Ok(());
    }

    let engine = AggregationEngine::new();
    let now = chrono::Utc::now();

    if let Some(forms_path) = args.forms.clone() {
        // Dashboard mode: aggregate across a set of forms
        let stats = match load_dashboard_inputs(&forms_path, &args) {
            Ok((forms, submissions, views)) => {
                engine.dashboard_stats(&forms, &submissions, &views, now)
            }
            Err(e) => {
                // A failed fetch reports empty statistics, not a raw error
                tracing::error!(error = %format!("{e:#}"), "Failed to load dashboard inputs");
                eprintln!("warning: {e:#}; reporting empty statistics");
                DashboardStatistics::default()
            }
        };

        if args.format == "json" {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_dashboard_stats(&stats);
        }
        return Ok(());
    }

    // Per-form mode
    let Some(schema_path) = args.schema.as_deref() else {
        anyhow::bail!("either --schema (per-form mode) or --forms (dashboard mode) is required");
    };

    let stats = match load_form_inputs(schema_path, &args) {
        Ok((schema, submissions, views)) => {
            let stats = engine.form_stats(&schema, &submissions, &views, now);
            if args.format != "json" {
                println!("Form: {} ({})", schema.title, schema.id);
            }
            stats
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Failed to load form inputs");
            eprintln!("warning: {e:#}; reporting empty statistics");
            FormStatistics::default()
        }
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_form_stats(&stats);
    }

    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {} file {}", what, path.display()))
}

fn load_views(args: &Args) -> Result<ViewSource> {
    match (&args.views, args.view_count) {
        (Some(path), _) => Ok(ViewSource::Events {
            events: load_json(path, "views")?,
        }),
        (None, Some(count)) => Ok(ViewSource::Counter { count }),
        (None, None) => Ok(ViewSource::Counter { count: 0 }),
    }
}

fn load_submissions(args: &Args) -> Result<Vec<SubmissionRecord>> {
    match &args.submissions {
        Some(path) => load_json(path, "submissions"),
        None => Ok(Vec::new()),
    }
}

fn load_form_inputs(
    schema_path: &Path,
    args: &Args,
) -> Result<(FormSchema, Vec<SubmissionRecord>, ViewSource)> {
    let schema = load_json(schema_path, "schema")?;
    Ok((schema, load_submissions(args)?, load_views(args)?))
}

fn load_dashboard_inputs(
    forms_path: &Path,
    args: &Args,
) -> Result<(Vec<FormSummary>, Vec<SubmissionRecord>, ViewSource)> {
    let forms = load_json(forms_path, "forms")?;
    Ok((forms, load_submissions(args)?, load_views(args)?))
}

fn print_form_stats(stats: &FormStatistics) {
    println!("  Submissions: {}", stats.total_submissions);
    println!("  Views: {}", stats.total_views);
    println!("  Conversion: {}%", stats.conversion_rate);
    println!("  Completion: {}%", stats.completion_rate);
    println!("  Avg completion time: {}", stats.average_completion_time);
    println!(
        "  Submissions growth (7d): {}",
        format::format_growth(stats.submissions_growth)
    );
    println!(
        "  Views growth (7d): {}",
        format::format_growth(stats.views_growth)
    );

    if !stats.trend.is_empty() {
        println!("  Trend:");
        for point in &stats.trend {
            println!("    {}  {}", point.date, point.count);
        }
    }

    if !stats.field_stats.is_empty() {
        println!("  Fields:");
        for field in &stats.field_stats {
            match &field.breakdown {
                FieldBreakdown::Choice { distribution } => {
                    println!(
                        "    [{}] {}: {} responses",
                        field.field_type, field.label, field.responses
                    );
                    for option in distribution {
                        println!(
                            "        {}: {} ({}%)",
                            option.option, option.count, option.percentage
                        );
                    }
                }
                FieldBreakdown::TextLength { average_length } => {
                    println!(
                        "    [{}] {}: {} responses (avg {} chars)",
                        field.field_type, field.label, field.responses, average_length
                    );
                }
                FieldBreakdown::None => {
                    println!(
                        "    [{}] {}: {} responses",
                        field.field_type, field.label, field.responses
                    );
                }
            }
        }
    }

    if !stats.drop_off_points.is_empty() {
        println!("  Drop-off:");
        for point in &stats.drop_off_points {
            println!("    {}: {}%", point.field_label, point.drop_off_rate);
        }
    }
}

fn print_dashboard_stats(stats: &DashboardStatistics) {
    println!("Dashboard");
    println!("  Forms: {}", stats.total_forms);
    println!("  Submissions: {}", stats.total_submissions);
    println!("  Views: {}", stats.total_views);
    println!("  Conversion: {}%", stats.conversion_rate);
    println!(
        "  Forms growth (30d): {}",
        format::format_growth(stats.forms_growth)
    );
    println!(
        "  Submissions growth (30d): {}",
        format::format_growth(stats.submissions_growth)
    );
    println!(
        "  Views growth (30d): {}",
        format::format_growth(stats.views_growth)
    );
    println!(
        "  Conversion growth (30d): {}",
        format::format_growth(stats.conversion_growth)
    );
}
