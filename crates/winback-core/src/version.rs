//! Dotted-numeric application version comparison.
//!
//! App versions are `.`-separated integer segments (`8.8.14`). Ordering is
//! numeric per segment with zero-padding for shorter sequences, so
//! `8.8 == 8.8.0` and `8.8.2 < 8.8.14`. A lexical comparison would wrongly
//! rank `8.8.2` above `8.8.14`.

use std::{cmp::Ordering, fmt, str::FromStr};

use thiserror::Error;

/// Failure to parse an [`AppVersion`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version string: {0:?}")]
pub struct ParseVersionError(pub String);

/// A dotted-numeric application version, e.g. `8.8.14`.
///
/// The original string is retained for display; comparisons use the parsed
/// segments only.
#[derive(Debug, Clone)]
pub struct AppVersion {
  raw:      String,
  segments: Vec<u64>,
}

impl AppVersion {
  pub fn as_str(&self) -> &str { &self.raw }

  /// Segment at `index`, treating absent segments as zero.
  fn segment(&self, index: usize) -> u64 {
    self.segments.get(index).copied().unwrap_or(0)
  }
}

impl FromStr for AppVersion {
  type Err = ParseVersionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(ParseVersionError(s.to_string()));
    }
    let segments = trimmed
      .split('.')
      .map(|segment| segment.parse::<u64>())
      .collect::<Result<Vec<_>, _>>()
      .map_err(|_| ParseVersionError(s.to_string()))?;
    Ok(Self {
      raw: trimmed.to_string(),
      segments,
    })
  }
}

impl fmt::Display for AppVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

impl Ord for AppVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    let len = self.segments.len().max(other.segments.len());
    for i in 0..len {
      match self.segment(i).cmp(&other.segment(i)) {
        Ordering::Equal => continue,
        unequal => return unequal,
      }
    }
    Ordering::Equal
  }
}

impl PartialOrd for AppVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for AppVersion {
  fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for AppVersion {}
