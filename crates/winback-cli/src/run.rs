//! Stage orchestration: two queries, three pure stages, one sink.

use anyhow::{Context, Result};
use tracing::info;
use winback_core::{
  pipeline::{Cohort, annotate, one_time_events},
  record::{FirstPurchase, PurchaseEvent},
};
use winback_jql::{JqlClient, JqlConfig, query};
use winback_report::{report_file_name, write_report};

use crate::config::AppConfig;

/// Run the pipeline once.
///
/// Stages are strictly ordered and each consumes the full output of the one
/// before it. An empty result at any stage is a normal early exit: the reason
/// is logged and the run succeeds without writing a file.
pub async fn run(cfg: &AppConfig) -> Result<()> {
  let client = JqlClient::new(JqlConfig {
    endpoint: cfg.endpoint.clone(),
    api_key:  cfg.api_key.clone(),
  })
  .context("failed to build query client")?;

  info!(reference_date = %cfg.reference_date, "fetching first-purchase dates");
  let first_purchases: Vec<FirstPurchase> = client
    .execute(query::FIRST_PURCHASE_SCRIPT)
    .await
    .context("first-purchase query failed")?;
  if first_purchases.is_empty() {
    info!("no first-purchase records; nothing to do");
    return Ok(());
  }

  let cohort = Cohort::select(first_purchases, cfg.reference_date);
  if cohort.is_empty() {
    info!(
      reference_date = %cfg.reference_date,
      "no customers first purchased on the reference date"
    );
    return Ok(());
  }

  info!(customers = cohort.len(), "fetching purchase logs for the cohort");
  let script = query::purchase_logs_script(&cohort.customer_ids());
  let events: Vec<PurchaseEvent> = client
    .execute(&script)
    .await
    .context("purchase-log query failed")?;
  if events.is_empty() {
    info!("no purchase logs found for the cohort; nothing to do");
    return Ok(());
  }

  let survivors = one_time_events(events);
  if survivors.is_empty() {
    info!("every cohort member purchased again; nothing to report");
    return Ok(());
  }

  let rows = annotate(survivors, &cohort, &cfg.latest_version)?;

  let path = cfg.output_dir.join(report_file_name(cfg.reference_date));
  write_report(&rows, &path)
    .with_context(|| format!("failed to write report to {}", path.display()))?;
  info!(rows = rows.len(), path = %path.display(), "report written");

  Ok(())
}
