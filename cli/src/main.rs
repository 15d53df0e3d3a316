//! Body Metrics CLI
//!
//! Usage:
//! ```bash
//! # Evaluate a spreadsheet export of the form, writing CSV to stdout
//! body-metrics evaluate --input people.csv
//!
//! # Evaluate JSON snapshots with a fixed measurement date
//! body-metrics evaluate --input people.json --format json --reference-date 2024-03-01
//!
//! # Single lookups
//! body-metrics classify-body-fat --sex female --age 35 --fat 25
//! body-metrics bmi --weight 70 --height 175
//! ```

use anyhow::{bail, Context, Result};
use body_metrics_cli::config::{AppConfig, LoggingConfig, ReportFormat};
use body_metrics_cli::report;
use body_metrics_shared::{classify_body_fat, compute_bmi, CalendarDate, Sex};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "body-metrics",
    version,
    about = "Body metrics calculator",
    long_about = "Computes age, BMI, frame size, waist-hip ratio and body-fat classification for form snapshots."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a file of form snapshots into a report
    Evaluate {
        /// CSV or JSON file of snapshots (format taken from the extension)
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Report format (defaults to report.format from configuration)
        #[arg(long, short = 'f', value_enum)]
        format: Option<ReportFormat>,

        /// Measurement date for rows without one (YYYY-MM-DD)
        #[arg(long)]
        reference_date: Option<CalendarDate>,
    },

    /// Classify a single body-fat percentage
    ClassifyBodyFat {
        #[arg(long)]
        sex: Sex,

        /// Age in completed years
        #[arg(long)]
        age: Option<u32>,

        /// Body-fat percentage
        #[arg(long)]
        fat: f64,
    },

    /// Compute and classify a single BMI
    Bmi {
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,

        /// Height in centimetres
        #[arg(long)]
        height: f64,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    init_tracing(&config.logging, cli.verbose);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %AppConfig::environment(),
        "Starting body-metrics"
    );

    match cli.command {
        Command::Evaluate {
            input,
            output,
            format,
            reference_date,
        } => {
            let reference_date = match reference_date {
                Some(date) => date,
                None => config
                    .report
                    .reference_date()?
                    .unwrap_or_else(|| CalendarDate::from(chrono::Local::now().date_naive())),
            };
            let format = format.unwrap_or(config.report.format);

            let snapshots = report::read_snapshots_from_path(&input)
                .with_context(|| format!("Failed to load {}", input.display()))?;
            let rows = report::evaluate_rows(snapshots, reference_date, &config.report);
            let rendered = report::render(&rows, format)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), rows = rows.len(), "Report written");
                }
                None => std::io::stdout()
                    .write_all(rendered.as_bytes())
                    .context("Failed to write report to stdout")?,
            }
        }
        Command::ClassifyBodyFat { sex, age, fat } => {
            let Some(classification) = classify_body_fat(fat, age, Some(sex)) else {
                bail!("Body-fat percentage must be a positive number");
            };
            println!("{}", classification.label());
        }
        Command::Bmi { weight, height } => {
            let Some(bmi) = compute_bmi(weight, height) else {
                bail!("Weight and height must be positive numbers");
            };
            println!("{} ({})", bmi.display_value(), bmi.category.description());
        }
    }

    Ok(())
}

/// Initialize tracing/logging; logs go to stderr so reports can be piped
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            "body_metrics_cli=debug,body_metrics_shared=debug".into()
        } else {
            logging.filter.as_str().into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if logging.json || AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
