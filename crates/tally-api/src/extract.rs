//! Request extractors whose rejections are [`ApiError`]s, so malformed paths
//! get the same JSON error body as every other failure.

use axum::{
  extract::{FromRequestParts, Path},
  http::request::Parts,
};
use tally_core::counter::UserId;

use crate::error::ApiError;

/// The `{user_id}` path segment, percent-decoded and validated.
#[derive(Debug)]
pub struct UserPath(pub UserId);

impl<S> FromRequestParts<S> for UserPath
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(UserPath(UserId::new(raw)?))
  }
}
