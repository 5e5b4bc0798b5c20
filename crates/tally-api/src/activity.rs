//! Handler for `GET /activity/:user_id`.
//!
//! Returns at most [`ACTIVITY_LIMIT`](tally_core::activity::ACTIVITY_LIMIT)
//! entries, newest first. There is no paging.

use std::sync::Arc;

use axum::{Json, extract::State};
use tally_core::{store::CounterStore, wire::ActivityResponse};

use crate::{error::ApiError, extract::UserPath};

/// `GET /activity/:user_id`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  UserPath(user_id): UserPath,
) -> Result<Json<ActivityResponse>, ApiError>
where
  S: CounterStore,
{
  let activities = store
    .activity(&user_id)
    .await
    .map_err(ApiError::store("failed to fetch activity"))?;
  Ok(Json(ActivityResponse { user_id, activities }))
}
