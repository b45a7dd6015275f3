//! The three pure pipeline stages: cohort selection, repeat-purchase
//! filtering, and annotation.
//!
//! Each stage consumes the full output of the previous one as an immutable
//! snapshot; nothing here touches the network or the filesystem.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::{
  Error, Result,
  record::{FirstPurchase, OneTimeBuyer, PurchaseEvent},
  version::AppVersion,
};

/// The reference date: `run_date` minus seven calendar days.
pub fn reference_date(run_date: NaiveDate) -> NaiveDate {
  run_date - Days::new(7)
}

// ─── Cohort selection ────────────────────────────────────────────────────────

/// Customers whose first qualifying purchase fell on the reference date.
///
/// Derived, never stored. Input order is preserved; ids are unique by the
/// upstream one-row-per-customer aggregation.
#[derive(Debug, Clone)]
pub struct Cohort {
  members: Vec<FirstPurchase>,
}

impl Cohort {
  /// Retain the records whose `first_purchase_date` equals `reference_date`.
  ///
  /// An empty result is the normal "nothing to do" outcome, not an error.
  pub fn select(
    records: Vec<FirstPurchase>,
    reference_date: NaiveDate,
  ) -> Self {
    let members = records
      .into_iter()
      .filter(|r| r.first_purchase_date == reference_date)
      .collect();
    Self { members }
  }

  pub fn is_empty(&self) -> bool { self.members.is_empty() }

  pub fn len(&self) -> usize { self.members.len() }

  pub fn members(&self) -> &[FirstPurchase] { &self.members }

  /// Member ids in cohort order, for the purchase-log query parameter.
  pub fn customer_ids(&self) -> Vec<&str> {
    self.members.iter().map(|r| r.customer_id.as_str()).collect()
  }
}

// ─── Repeat-purchase filter ──────────────────────────────────────────────────

/// Retain the single event of every customer with exactly one purchase event.
///
/// Customers with two or more events are dropped entirely; no partial
/// retention of a "first" row. Only the group size matters, so event ordering
/// and duplicate timestamps are irrelevant. Input order is preserved for the
/// survivors.
pub fn one_time_events(events: Vec<PurchaseEvent>) -> Vec<PurchaseEvent> {
  let mut counts: HashMap<String, usize> = HashMap::new();
  for event in &events {
    *counts.entry(event.customer_id.clone()).or_insert(0) += 1;
  }
  events
    .into_iter()
    .filter(|e| counts[&e.customer_id] == 1)
    .collect()
}

// ─── Annotation ──────────────────────────────────────────────────────────────

/// Join surviving events back to their first-purchase dates and flag
/// app-version recency against `latest`.
///
/// Rows come back sorted ascending by `first_purchase_date`; the sort is
/// stable, so rows sharing a date keep their input order.
///
/// # Errors
///
/// - [`Error::MissingFirstPurchase`] if an event's customer is absent from
///   the cohort.
/// - [`Error::InvalidVersion`] if an event's `app_version` does not parse.
///   An unparseable version is surfaced with the offending record, never
///   coerced to a default comparison result.
pub fn annotate(
  events: Vec<PurchaseEvent>,
  cohort: &Cohort,
  latest: &AppVersion,
) -> Result<Vec<OneTimeBuyer>> {
  let first_dates: HashMap<&str, NaiveDate> = cohort
    .members()
    .iter()
    .map(|r| (r.customer_id.as_str(), r.first_purchase_date))
    .collect();

  let mut rows = Vec::with_capacity(events.len());
  for event in events {
    let first_purchase_date = *first_dates
      .get(event.customer_id.as_str())
      .ok_or_else(|| Error::MissingFirstPurchase(event.customer_id.clone()))?;

    let version: AppVersion =
      event.app_version.parse().map_err(|_| Error::InvalidVersion {
        customer_id: event.customer_id.clone(),
        value:       event.app_version.clone(),
      })?;

    rows.push(OneTimeBuyer {
      customer_id: event.customer_id,
      station: event.station,
      zone: event.zone,
      app_version: event.app_version,
      is_latest_version: &version >= latest,
      amount: event.amount,
      first_purchase_date,
    });
  }

  rows.sort_by_key(|row| row.first_purchase_date);
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
  }

  fn first(customer_id: &str, date: NaiveDate) -> FirstPurchase {
    FirstPurchase {
      customer_id: customer_id.to_string(),
      first_purchase_date: date,
    }
  }

  fn event(customer_id: &str, date: NaiveDate, version: &str) -> PurchaseEvent {
    PurchaseEvent {
      customer_id: customer_id.to_string(),
      event_date: date,
      station: "Accra Central".to_string(),
      zone: "Zone A".to_string(),
      app_version: version.to_string(),
      amount: 25.0,
    }
  }

  fn latest() -> AppVersion { "8.8.14".parse().unwrap() }

  // ── Reference date ────────────────────────────────────────────────────

  #[test]
  fn reference_date_is_seven_days_back() {
    assert_eq!(reference_date(d(2024, 6, 8)), d(2024, 6, 1));
    // Across a month boundary.
    assert_eq!(reference_date(d(2024, 3, 3)), d(2024, 2, 25));
  }

  // ── Cohort selection ──────────────────────────────────────────────────

  #[test]
  fn cohort_keeps_only_the_reference_date() {
    let reference = d(2024, 6, 1);
    let records = vec![
      first("a", reference),
      first("b", d(2024, 6, 2)),  // 6 days before the run date
      first("c", d(2024, 5, 31)), // 8 days before the run date
      first("d", reference),
    ];

    let cohort = Cohort::select(records, reference);
    assert_eq!(cohort.customer_ids(), vec!["a", "d"]);
    assert_eq!(cohort.len(), 2);
  }

  #[test]
  fn cohort_preserves_input_order() {
    let reference = d(2024, 6, 1);
    let records = vec![
      first("z", reference),
      first("a", reference),
      first("m", reference),
    ];

    let cohort = Cohort::select(records, reference);
    assert_eq!(cohort.customer_ids(), vec!["z", "a", "m"]);
  }

  #[test]
  fn cohort_from_empty_input_is_empty() {
    let cohort = Cohort::select(Vec::new(), d(2024, 6, 1));
    assert!(cohort.is_empty());
  }

  // ── Repeat-purchase filter ────────────────────────────────────────────

  #[test]
  fn singleton_groups_survive() {
    let events = vec![
      event("a", d(2024, 6, 1), "8.8.14"),
      event("b", d(2024, 6, 1), "8.8.14"),
    ];

    let survivors = one_time_events(events);
    assert_eq!(survivors.len(), 2);
  }

  #[test]
  fn repeat_groups_are_fully_excluded() {
    let events = vec![
      event("a", d(2024, 6, 1), "8.8.14"),
      event("b", d(2024, 6, 1), "8.8.14"),
      event("b", d(2024, 6, 5), "8.8.14"),
    ];

    let survivors = one_time_events(events);
    // No partial retention: not even b's first event survives.
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].customer_id, "a");
  }

  #[test]
  fn three_or_more_events_also_excluded() {
    let events = vec![
      event("a", d(2024, 6, 1), "8.8.14"),
      event("a", d(2024, 6, 2), "8.8.14"),
      event("a", d(2024, 6, 3), "8.8.14"),
    ];
    assert!(one_time_events(events).is_empty());
  }

  #[test]
  fn filter_preserves_input_order() {
    let events = vec![
      event("c", d(2024, 6, 1), "8.8.14"),
      event("a", d(2024, 6, 1), "8.8.14"),
      event("b", d(2024, 6, 1), "8.8.14"),
    ];

    let ids: Vec<String> = one_time_events(events)
      .into_iter()
      .map(|e| e.customer_id)
      .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
  }

  // ── Annotation ────────────────────────────────────────────────────────

  #[test]
  fn annotate_joins_dates_and_flags_recency() {
    let reference = d(2024, 6, 1);
    let cohort = Cohort::select(
      vec![first("a", reference), first("b", reference)],
      reference,
    );
    let events = vec![
      event("a", reference, "8.8.14"),
      event("b", reference, "8.8.2"),
    ];

    let rows = annotate(events, &cohort, &latest()).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_latest_version);
    assert!(!rows[1].is_latest_version);
    assert_eq!(rows[0].first_purchase_date, reference);
  }

  #[test]
  fn annotate_sorts_ascending_and_stable() {
    let reference = d(2024, 6, 1);
    let later = d(2024, 6, 3);
    let cohort = Cohort {
      members: vec![
        first("late", later),
        first("x", reference),
        first("y", reference),
      ],
    };
    let events = vec![
      event("late", later, "8.8.14"),
      event("x", reference, "8.8.14"),
      event("y", reference, "8.8.14"),
    ];

    let rows = annotate(events, &cohort, &latest()).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.customer_id.as_str()).collect();
    // Ascending by date; x and y share a date and keep their input order.
    assert_eq!(ids, vec!["x", "y", "late"]);
  }

  #[test]
  fn annotate_rejects_unknown_customer() {
    let reference = d(2024, 6, 1);
    let cohort = Cohort::select(vec![first("a", reference)], reference);
    let events = vec![event("ghost", reference, "8.8.14")];

    let err = annotate(events, &cohort, &latest()).unwrap_err();
    assert!(matches!(err, Error::MissingFirstPurchase(id) if id == "ghost"));
  }

  #[test]
  fn annotate_rejects_unparseable_version() {
    let reference = d(2024, 6, 1);
    let cohort = Cohort::select(vec![first("a", reference)], reference);
    let events = vec![event("a", reference, "unknown")];

    let err = annotate(events, &cohort, &latest()).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidVersion { customer_id, value }
        if customer_id == "a" && value == "unknown"
    ));
  }

  // ── Stage composition ─────────────────────────────────────────────────

  #[test]
  fn one_time_buyer_scenario_end_to_end() {
    let run_date = d(2024, 6, 8);
    let reference = reference_date(run_date);

    // A and B first purchased exactly 7 days ago; C only 3 days ago.
    let records = vec![
      first("a", reference),
      first("b", reference),
      first("c", d(2024, 6, 5)),
    ];
    let cohort = Cohort::select(records, reference);
    assert_eq!(cohort.customer_ids(), vec!["a", "b"]);

    // B purchased again the day before the run.
    let logs = vec![
      event("a", reference, "8.8.14"),
      event("b", reference, "8.8.14"),
      event("b", d(2024, 6, 7), "8.8.14"),
    ];
    let survivors = one_time_events(logs);
    let rows = annotate(survivors, &cohort, &latest()).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].customer_id, "a");
    assert!(rows[0].is_latest_version);
    assert_eq!(rows[0].first_purchase_date, reference);
  }
}
