//! Async HTTP client wrapping the tally JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tally_core::{
  activity::{Action, ActivityLogEntry},
  counter::UserId,
  wire::{
    ActivityResponse, CountResponse, ErrorBody, HealthReport, MutationResponse,
    SetCountBody,
  },
};

/// Connection settings for the tally API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the tally JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  base:   Url,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .context("failed to build HTTP client")?;
    let base = Url::parse(&config.base_url)
      .with_context(|| format!("invalid server URL {:?}", config.base_url))?;
    if base.cannot_be_a_base() {
      return Err(anyhow!("server URL {:?} cannot be a base", config.base_url));
    }
    Ok(Self { client, base })
  }

  /// `<base>/api/<segments...>`, with each segment percent-encoded.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().push("api").extend(segments);
    }
    url
  }

  // ── Health ────────────────────────────────────────────────────────────────

  /// `GET /api/health`
  pub async fn health(&self) -> Result<HealthReport> {
    let resp = self
      .client
      .get(self.url(&["health"]))
      .send()
      .await
      .context("GET /health failed")?;
    decode(resp, "GET /health").await
  }

  // ── Counter ───────────────────────────────────────────────────────────────

  /// `GET /api/counter/<user_id>`
  pub async fn get_count(&self, user_id: &UserId) -> Result<i64> {
    let resp = self
      .client
      .get(self.url(&["counter", user_id.as_str()]))
      .send()
      .await
      .context("GET /counter failed")?;
    let body: CountResponse = decode(resp, "GET /counter").await?;
    Ok(body.count)
  }

  /// `POST /api/counter/<user_id>` with `{count, action?}`
  pub async fn set_count(
    &self,
    user_id: &UserId,
    count: i64,
    action: Option<Action>,
  ) -> Result<i64> {
    let resp = self
      .client
      .post(self.url(&["counter", user_id.as_str()]))
      .json(&SetCountBody { count, action })
      .send()
      .await
      .context("POST /counter failed")?;
    let body: MutationResponse = decode(resp, "POST /counter").await?;
    Ok(body.count)
  }

  /// `POST /api/counter/<user_id>/increment`
  pub async fn increment(&self, user_id: &UserId) -> Result<i64> {
    self.mutate(user_id, "increment").await
  }

  /// `POST /api/counter/<user_id>/decrement`
  pub async fn decrement(&self, user_id: &UserId) -> Result<i64> {
    self.mutate(user_id, "decrement").await
  }

  /// `POST /api/counter/<user_id>/reset`
  pub async fn reset(&self, user_id: &UserId) -> Result<i64> {
    self.mutate(user_id, "reset").await
  }

  async fn mutate(&self, user_id: &UserId, op: &str) -> Result<i64> {
    let what = format!("POST /counter/{op}");
    let resp = self
      .client
      .post(self.url(&["counter", user_id.as_str(), op]))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    let body: MutationResponse = decode(resp, &what).await?;
    Ok(body.count)
  }

  // ── Activity ──────────────────────────────────────────────────────────────

  /// `GET /api/activity/<user_id>`
  pub async fn activity(&self, user_id: &UserId) -> Result<Vec<ActivityLogEntry>> {
    let resp = self
      .client
      .get(self.url(&["activity", user_id.as_str()]))
      .send()
      .await
      .context("GET /activity failed")?;
    let body: ActivityResponse = decode(resp, "GET /activity").await?;
    Ok(body.activities)
  }
}

/// Deserialise a success body, or turn an error body into an `anyhow` error
/// carrying the server's message.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    return resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"));
  }
  match resp.json::<ErrorBody>().await {
    Ok(body) => Err(anyhow!("{what} → {status}: {}", body.message)),
    Err(_) => Err(anyhow!("{what} → {status}")),
  }
}
