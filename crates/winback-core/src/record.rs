//! Flat records exchanged with the analytics backend and the report sink.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row per distinct customer: the calendar date of their first qualifying
/// purchase. The upstream aggregation is keyed by minimum event time, so
/// `customer_id` is unique within a result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstPurchase {
  pub customer_id:         String,
  pub first_purchase_date: NaiveDate,
}

/// A single qualifying purchase event, timestamp truncated to a calendar date
/// by the backend. Zero or more per customer; unordered as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseEvent {
  pub customer_id: String,
  pub event_date:  NaiveDate,
  pub station:     String,
  pub zone:        String,
  pub app_version: String,
  pub amount:      f64,
}

/// An output row: a cohort member with exactly one purchase event in the
/// observed history. Field order is the report column order.
#[derive(Debug, Clone, Serialize)]
pub struct OneTimeBuyer {
  pub customer_id:         String,
  pub station:             String,
  pub zone:                String,
  pub app_version:         String,
  pub is_latest_version:   bool,
  pub amount:              f64,
  pub first_purchase_date: NaiveDate,
}
