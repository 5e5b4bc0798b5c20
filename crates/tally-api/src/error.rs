//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use tally_core::wire::ErrorBody;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Storage failures carry a fixed, operation-specific message for the caller;
/// the underlying error is logged but never put on the wire.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("{message}")]
  Store {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Adapter for `map_err` that tags a store error with `message`.
  pub fn store<E>(message: &'static str) -> impl FnOnce(E) -> ApiError
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    move |e| ApiError::Store { message, source: Box::new(e) }
  }
}

impl From<tally_core::Error> for ApiError {
  fn from(e: tally_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, "bad_request", m),
      ApiError::Store { message, source } => {
        tracing::error!(error = %source, "{message}");
        (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message.to_owned())
      }
    };
    let body = ErrorBody { error: kind.to_owned(), message };
    (status, Json(body)).into_response()
  }
}
