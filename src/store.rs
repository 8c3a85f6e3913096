//! Minimal client for the remote REST datastore (catalog provider + result
//! sink). REST-style resource endpoints over JSON, key-authenticated.
//!
//! The client is constructed once from env and passed in explicitly; no
//! module-level singletons. Calls are instrumented and log endpoints and
//! row counts, never payload contents or the API key.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::{ActionTemplate, Category, Question};

#[derive(Clone)]
pub struct Store {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
}

impl Store {
  /// Construct the client if we find STORE_BASE_URL; otherwise return None
  /// and the service runs on local catalog sources only.
  pub fn from_env() -> Option<Self> {
    let base_url = std::env::var("STORE_BASE_URL").ok()?;
    let api_key = std::env::var("STORE_API_KEY").unwrap_or_default();

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(15))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url })
  }

  /// GET a resource collection as typed rows.
  #[instrument(level = "info", skip(self), fields(%resource))]
  async fn fetch_rows<T: serde::de::DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, String> {
    let url = format!("{}/{}", self.base_url.trim_end_matches('/'), resource);
    let res = self
      .client
      .get(&url)
      .header(USER_AGENT, "datrix-backend/0.1")
      .header("apikey", &self.api_key)
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      return Err(format!("store HTTP {}: {}", status, extract_store_error(&body)));
    }

    let rows: Vec<T> = res.json().await.map_err(|e| e.to_string())?;
    info!(target: "datrix_backend", %resource, rows = rows.len(), "Fetched store rows");
    Ok(rows)
  }

  pub async fn fetch_categories(&self) -> Result<Vec<Category>, String> {
    self.fetch_rows("assessment_categories").await
  }

  pub async fn fetch_questions(&self) -> Result<Vec<Question>, String> {
    self.fetch_rows("assessment_questions").await
  }

  pub async fn fetch_actions(&self) -> Result<Vec<ActionTemplate>, String> {
    self.fetch_rows("assessment_actions").await
  }

  /// Persist a scored assessment. Best-effort from the caller's point of
  /// view: failures are reported back as strings and logged there.
  #[instrument(level = "info", skip(self, record), fields(%assessment_id))]
  pub async fn save_assessment<T: Serialize>(
    &self,
    assessment_id: &str,
    record: &T,
  ) -> Result<(), String> {
    let url = format!("{}/assessments", self.base_url.trim_end_matches('/'));
    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "datrix-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("apikey", &self.api_key)
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(record)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      return Err(format!("store HTTP {}: {}", status, extract_store_error(&body)));
    }

    info!(target: "datrix_backend", %assessment_id, "Assessment persisted to store");
    Ok(())
  }
}

/// Stores commonly wrap errors as {"message": "..."}; unwrap that when
/// present, and keep whatever we log at a sane size.
fn extract_store_error(body: &str) -> String {
  let msg = serde_json::from_str::<Value>(body)
    .ok()
    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
    .unwrap_or_else(|| body.to_string());
  crate::util::trunc_for_log(&msg, 300)
}
