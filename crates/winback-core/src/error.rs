//! Error types for `winback-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A surviving purchase event references a customer with no first-purchase
  /// record in the cohort. Upstream invariants make this a data-integrity
  /// failure, never something to drop silently.
  #[error("no first-purchase record for customer {0}")]
  MissingFirstPurchase(String),

  /// An event carried an app version that does not parse as dotted integers.
  #[error("customer {customer_id}: invalid app version {value:?}")]
  InvalidVersion {
    customer_id: String,
    value:       String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
