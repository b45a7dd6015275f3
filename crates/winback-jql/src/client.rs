//! Async HTTP client for the analytics backend's JQL endpoint.

use reqwest::{Client, header};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Connection settings for the JQL endpoint.
#[derive(Debug, Clone)]
pub struct JqlConfig {
  /// Full URL of the query endpoint.
  pub endpoint: String,
  /// Raw `authorization` header value, supplied out-of-band.
  pub api_key:  String,
}

/// Executes JQL scripts and decodes the flat-record responses.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. No request
/// timeout is set: a full-history scan may run long, and the caller may
/// impose an external one.
#[derive(Clone)]
pub struct JqlClient {
  client: Client,
  config: JqlConfig,
}

impl JqlClient {
  pub fn new(config: JqlConfig) -> Result<Self> {
    let client = Client::builder().build()?;
    Ok(Self { client, config })
  }

  /// POST `script` form-encoded and decode the JSON array response.
  ///
  /// An empty (or whitespace-only) response body decodes to an empty vector.
  /// A non-success status or an undecodable payload is fatal for the run; no
  /// retries are attempted.
  pub async fn execute<T: DeserializeOwned>(
    &self,
    script: &str,
  ) -> Result<Vec<T>> {
    let response = self
      .client
      .post(&self.config.endpoint)
      .header(header::ACCEPT, "application/json")
      .header(header::AUTHORIZATION, &self.config.api_key)
      .form(&[("script", script)])
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(Error::Api { status, body });
    }

    decode_rows(&response.text().await?)
  }
}

/// Decode a response body, tolerating an empty body as an empty result set.
fn decode_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
  let trimmed = body.trim();
  if trimmed.is_empty() {
    return Ok(Vec::new());
  }
  Ok(serde_json::from_str(trimmed)?)
}
