//! Error types for `winback-jql`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("query request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("query endpoint returned {status}: {body}")]
  Api { status: StatusCode, body: String },

  #[error("failed to decode query response: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
