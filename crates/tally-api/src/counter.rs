//! Handlers for `/counter` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/counter/:user_id` | `0` if the user has never written; creates nothing |
//! | `POST` | `/counter/:user_id` | Body: `{"count":42,"action":"update"}`; `action` optional |
//! | `POST` | `/counter/:user_id/increment` | Creates the counter at `1` if absent |
//! | `POST` | `/counter/:user_id/decrement` | Creates the counter at `-1` if absent |
//! | `POST` | `/counter/:user_id/reset` | Never creates a counter; always logs |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use tally_core::{
  counter::UserId,
  store::CounterStore,
  wire::{CountResponse, MutationResponse, SetCountBody},
};

use crate::{error::ApiError, extract::UserPath};

fn mutated(user_id: UserId, count: i64) -> Json<MutationResponse> {
  Json(MutationResponse { success: true, user_id, count })
}

// ─── Get ──────────────────────────────────────────────────────────────────────

/// `GET /counter/:user_id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  UserPath(user_id): UserPath,
) -> Result<Json<CountResponse>, ApiError>
where
  S: CounterStore,
{
  let count = store
    .get_count(&user_id)
    .await
    .map_err(ApiError::store("failed to fetch counter"))?;
  Ok(Json(CountResponse { user_id, count }))
}

// ─── Set ──────────────────────────────────────────────────────────────────────

/// `POST /counter/:user_id` — body: [`SetCountBody`].
pub async fn set<S>(
  State(store): State<Arc<S>>,
  UserPath(user_id): UserPath,
  body: Result<Json<SetCountBody>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError>
where
  S: CounterStore,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let count = store
    .set_count(&user_id, body.count, body.action.unwrap_or_default())
    .await
    .map_err(ApiError::store("failed to update counter"))?;
  Ok(mutated(user_id, count))
}

// ─── Increment / decrement / reset ────────────────────────────────────────────

/// `POST /counter/:user_id/increment`
pub async fn increment<S>(
  State(store): State<Arc<S>>,
  UserPath(user_id): UserPath,
) -> Result<Json<MutationResponse>, ApiError>
where
  S: CounterStore,
{
  let count = store
    .increment(&user_id)
    .await
    .map_err(ApiError::store("failed to increment counter"))?;
  Ok(mutated(user_id, count))
}

/// `POST /counter/:user_id/decrement`
pub async fn decrement<S>(
  State(store): State<Arc<S>>,
  UserPath(user_id): UserPath,
) -> Result<Json<MutationResponse>, ApiError>
where
  S: CounterStore,
{
  let count = store
    .decrement(&user_id)
    .await
    .map_err(ApiError::store("failed to decrement counter"))?;
  Ok(mutated(user_id, count))
}

/// `POST /counter/:user_id/reset`
pub async fn reset<S>(
  State(store): State<Arc<S>>,
  UserPath(user_id): UserPath,
) -> Result<Json<MutationResponse>, ApiError>
where
  S: CounterStore,
{
  let count = store
    .reset(&user_id)
    .await
    .map_err(ApiError::store("failed to reset counter"))?;
  Ok(mutated(user_id, count))
}
