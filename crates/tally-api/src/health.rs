//! Handler for `GET /health`.

use std::sync::Arc;

use axum::{Json, extract::State};
use tally_core::{store::CounterStore, wire::HealthReport};

/// `GET /health` — always `200 OK`; an unreachable store is reported in the
/// body as `"status": "degraded"`.
pub async fn check<S>(State(store): State<Arc<S>>) -> Json<HealthReport>
where
  S: CounterStore,
{
  let reachable = match store.ping().await {
    Ok(()) => true,
    Err(e) => {
      tracing::warn!(error = %e, "health check: store unreachable");
      false
    }
  };
  Json(HealthReport::new(reachable))
}
