//! Runtime configuration, resolved once at startup.
//!
//! Sources, lowest to highest precedence: the optional TOML config file,
//! then `WINBACK_*` environment variables. The `--reference-date` flag
//! overrides the computed date.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use winback_core::{pipeline, version::AppVersion};

const DEFAULT_ENDPOINT: &str = "https://mixpanel.com/api/query/jql";
const DEFAULT_LATEST_VERSION: &str = "8.8.14";

/// Shape of the config-file / environment layer.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
  api_key:        Option<String>,
  endpoint:       Option<String>,
  output_dir:     Option<PathBuf>,
  latest_version: Option<String>,
}

/// Fully-resolved configuration, passed by reference into the pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Raw `authorization` header value for the query endpoint.
  pub api_key:        String,
  pub endpoint:       String,
  pub output_dir:     PathBuf,
  /// Version threshold for the `is_latest_version` report column.
  pub latest_version: AppVersion,
  /// The cohort's first-purchase date: run date − 7 days unless overridden.
  pub reference_date: NaiveDate,
}

pub fn load(
  config_file: &Path,
  reference_date: Option<NaiveDate>,
) -> Result<AppConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(config_file.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("WINBACK"))
    .build()
    .context("failed to read configuration")?;

  let raw: RawConfig = settings
    .try_deserialize()
    .context("failed to deserialise configuration")?;

  // The credential is checked before any network call.
  let api_key = raw
    .api_key
    .context("api_key is not set (WINBACK_API_KEY or the config file)")?;

  let latest_version = raw
    .latest_version
    .as_deref()
    .unwrap_or(DEFAULT_LATEST_VERSION)
    .parse::<AppVersion>()
    .context("invalid latest_version in configuration")?;

  let output_dir = raw
    .output_dir
    .map(expand_tilde)
    .unwrap_or_else(default_output_dir);

  let reference_date = reference_date
    .unwrap_or_else(|| pipeline::reference_date(Utc::now().date_naive()));

  Ok(AppConfig {
    api_key,
    endpoint: raw.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
    output_dir,
    latest_version,
    reference_date,
  })
}

/// `~/Downloads`, for local analyst runs; scheduled runs set
/// `WINBACK_OUTPUT_DIR`.
fn default_output_dir() -> PathBuf {
  match std::env::var("HOME") {
    Ok(home) => PathBuf::from(home).join("Downloads"),
    Err(_) => PathBuf::from("."),
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: PathBuf) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path
}
