//! CSV report sink for one-time-buyer rows.
//!
//! Column order is fixed by the field order of
//! [`winback_core::record::OneTimeBuyer`]: `customer_id, station, zone,
//! app_version, is_latest_version, amount, first_purchase_date`.

use std::{fs, path::Path};

use chrono::NaiveDate;
use thiserror::Error;
use winback_core::record::OneTimeBuyer;

#[derive(Debug, Error)]
pub enum Error {
  #[error("report I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to write report row: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// File name for the report keyed to its reference date:
/// `one_time_buyers_<date>.csv`.
pub fn report_file_name(reference_date: NaiveDate) -> String {
  format!("one_time_buyers_{reference_date}.csv")
}

/// Write `rows` to `destination`, creating missing parent directories.
///
/// The destination path is deterministic per reference date, so a re-run
/// overwrites the previous report rather than accumulating files.
pub fn write_report(rows: &[OneTimeBuyer], destination: &Path) -> Result<()> {
  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent)?;
  }

  let mut writer = csv::Writer::from_path(destination)?;
  for row in rows {
    writer.serialize(row)?;
  }
  writer.flush()?;
  Ok(())
}
