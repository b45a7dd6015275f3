//! `winback` — daily one-time-buyer report.
//!
//! Finds customers whose first qualifying purchase was exactly seven days
//! ago and who never purchased again, then writes a CSV report annotated
//! with app-version recency.
//!
//! # Usage
//!
//! ```
//! export WINBACK_API_KEY="Basic …"
//! winback
//! winback --reference-date 2024-06-01   # rerun for a past cohort
//! ```

mod config;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "winback", about = "Daily one-time-buyer report")]
struct Args {
  /// Path to a TOML config file (api_key, endpoint, output_dir,
  /// latest_version).
  #[arg(short, long, default_value = "winback.toml")]
  config: PathBuf,

  /// Override the reference date (defaults to the UTC run date minus seven
  /// days).
  #[arg(long, value_name = "YYYY-MM-DD")]
  reference_date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let cfg = config::load(&args.config, args.reference_date)?;
  run::run(&cfg).await
}
