//! JSON REST API for Tally.
//!
//! Exposes an axum [`Router`] backed by any [`tally_core::store::CounterStore`].
//! CORS, tracing and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(store.clone()))
//! ```

pub mod activity;
pub mod counter;
pub mod error;
pub mod extract;
pub mod health;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::store::CounterStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CounterStore + 'static,
{
  Router::new()
    .route("/health", get(health::check::<S>))
    // Counter
    .route(
      "/counter/{user_id}",
      get(counter::get_one::<S>).post(counter::set::<S>),
    )
    .route("/counter/{user_id}/increment", post(counter::increment::<S>))
    .route("/counter/{user_id}/decrement", post(counter::decrement::<S>))
    .route("/counter/{user_id}/reset", post(counter::reset::<S>))
    // Activity
    .route("/activity/{user_id}", get(activity::list::<S>))
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tally_core::{
    activity::{Action, ActivityLogEntry},
    counter::{Counter, UserId},
  };
  use tally_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn sqlite_router() -> (Router, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    (api_router(store.clone()), store)
  }

  async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = router
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_reachable_store() {
    let (router, _) = sqlite_router().await;
    let (status, body) = call(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["databaseReachable"], true);
    assert!(body["timestamp"].is_string());
  }

  #[tokio::test]
  async fn health_degrades_instead_of_failing() {
    let router = api_router(Arc::new(DownStore));
    let (status, body) = call(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["databaseReachable"], false);
  }

  // ── Counter ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_unknown_counter_is_zero_and_not_persisted() {
    let (router, store) = sqlite_router().await;
    let (status, body) = call(&router, "GET", "/counter/user-new", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "userId": "user-new", "count": 0 }));

    let id = UserId::new("user-new").unwrap();
    assert!(store.get_counter(&id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn set_then_get_round_trips() {
    let (router, _) = sqlite_router().await;
    let (status, body) = call(
      &router,
      "POST",
      "/counter/u1",
      Some(json!({ "count": 42, "action": "update" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "userId": "u1", "count": 42 }));

    let (_, body) = call(&router, "GET", "/counter/u1", None).await;
    assert_eq!(body["count"], 42);
  }

  #[tokio::test]
  async fn set_without_action_logs_update() {
    let (router, _) = sqlite_router().await;
    call(&router, "POST", "/counter/u2", Some(json!({ "count": -3 }))).await;

    let (_, body) = call(&router, "GET", "/activity/u2", None).await;
    let entries = body["activities"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "update");
    assert_eq!(entries[0]["value"], -3);
    assert_eq!(entries[0]["userId"], "u2");
  }

  #[tokio::test]
  async fn set_with_malformed_body_is_bad_request() {
    let (router, _) = sqlite_router().await;
    let (status, body) =
      call(&router, "POST", "/counter/u3", Some(json!({ "count": "many" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());

    let (status, _) = call(
      &router,
      "POST",
      "/counter/u3",
      Some(json!({ "count": 1, "action": "explode" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn whitespace_user_id_is_accepted() {
    let (router, _) = sqlite_router().await;
    let (status, body) = call(&router, "POST", "/counter/%20/increment", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "userId": " ", "count": 1 }));
  }

  #[tokio::test]
  async fn undecodable_user_id_is_json_bad_request() {
    let (router, _) = sqlite_router().await;

    for (method, uri) in [
      ("GET", "/counter/%FF"),
      ("POST", "/counter/%FF/increment"),
      ("POST", "/counter/%FF/decrement"),
      ("POST", "/counter/%FF/reset"),
      ("GET", "/activity/%FF"),
    ] {
      let (status, body) = call(&router, method, uri, None).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
      assert_eq!(body["error"], "bad_request", "{method} {uri}");
      assert!(body["message"].is_string());
    }

    let (status, body) =
      call(&router, "POST", "/counter/%FF", Some(json!({ "count": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
  }

  #[tokio::test]
  async fn increment_decrement_reset_flow() {
    let (router, _) = sqlite_router().await;

    let (_, body) = call(&router, "POST", "/counter/flow/increment", None).await;
    assert_eq!(body, json!({ "success": true, "userId": "flow", "count": 1 }));
    let (_, body) = call(&router, "POST", "/counter/flow/increment", None).await;
    assert_eq!(body["count"], 2);
    let (_, body) = call(&router, "POST", "/counter/flow/decrement", None).await;
    assert_eq!(body["count"], 1);
    let (_, body) = call(&router, "POST", "/counter/flow/reset", None).await;
    assert_eq!(body["count"], 0);

    let (_, body) = call(&router, "GET", "/activity/flow", None).await;
    let actions: Vec<&str> = body["activities"]
      .as_array()
      .unwrap()
      .iter()
      .map(|e| e["action"].as_str().unwrap())
      .collect();
    assert_eq!(actions, ["reset", "decrement", "increment", "increment"]);
  }

  #[tokio::test]
  async fn decrement_from_fresh_is_negative_one() {
    let (router, _) = sqlite_router().await;
    let (_, body) = call(&router, "POST", "/counter/neg/decrement", None).await;
    assert_eq!(body["count"], -1);
  }

  #[tokio::test]
  async fn reset_unknown_user_creates_no_counter() {
    let (router, store) = sqlite_router().await;
    let (status, body) = call(&router, "POST", "/counter/ghost/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let id = UserId::new("ghost").unwrap();
    assert!(store.get_counter(&id).await.unwrap().is_none());
    assert_eq!(store.activity(&id).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn unknown_route_is_404() {
    let (router, _) = sqlite_router().await;
    let (status, _) = call(&router, "POST", "/counter/u/multiply", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Storage failures ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn overflow_at_i64_bounds_is_storage_error() {
    let (router, store) = sqlite_router().await;

    for (uri, start, msg) in [
      ("/counter/top/increment", i64::MAX, "failed to increment counter"),
      ("/counter/bottom/decrement", i64::MIN, "failed to decrement counter"),
    ] {
      let user = uri.split('/').nth(2).unwrap();
      let id = UserId::new(user).unwrap();
      store.set_count(&id, start, Action::Update).await.unwrap();

      let (status, body) = call(&router, "POST", uri, None).await;
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
      assert_eq!(body["error"], "storage_error");
      assert_eq!(body["message"], msg);

      let (_, body) = call(&router, "GET", &format!("/counter/{user}"), None).await;
      assert_eq!(body["count"], start);
    }
  }

  #[tokio::test]
  async fn storage_failure_is_structured_500_without_raw_error() {
    let router = api_router(Arc::new(DownStore));

    for (method, uri, msg) in [
      ("GET", "/counter/u", "failed to fetch counter"),
      ("POST", "/counter/u/increment", "failed to increment counter"),
      ("POST", "/counter/u/decrement", "failed to decrement counter"),
      ("POST", "/counter/u/reset", "failed to reset counter"),
      ("GET", "/activity/u", "failed to fetch activity"),
    ] {
      let (status, body) = call(&router, method, uri, None).await;
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
      assert_eq!(body["error"], "storage_error");
      assert_eq!(body["message"], msg);
      assert!(!body.to_string().contains("disk on fire"));
    }

    let (status, body) =
      call(&router, "POST", "/counter/u", Some(json!({ "count": 1 }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "failed to update counter");
  }

  // ── Test doubles ────────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("disk on fire")]
  struct Down;

  /// A store whose every call fails.
  struct DownStore;

  impl CounterStore for DownStore {
    type Error = Down;

    async fn ping(&self) -> Result<(), Down> { Err(Down) }

    async fn get_counter(&self, _: &UserId) -> Result<Option<Counter>, Down> { Err(Down) }

    async fn get_count(&self, _: &UserId) -> Result<i64, Down> { Err(Down) }

    async fn activity(&self, _: &UserId) -> Result<Vec<ActivityLogEntry>, Down> { Err(Down) }

    async fn set_count(&self, _: &UserId, _: i64, _: Action) -> Result<i64, Down> { Err(Down) }

    async fn increment(&self, _: &UserId) -> Result<i64, Down> { Err(Down) }

    async fn decrement(&self, _: &UserId) -> Result<i64, Down> { Err(Down) }

    async fn reset(&self, _: &UserId) -> Result<i64, Down> { Err(Down) }
  }
}
