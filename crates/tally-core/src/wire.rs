//! JSON bodies exchanged between `tally-api` and its clients.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  activity::{Action, ActivityLogEntry},
  counter::UserId,
};

/// Body of `GET /counter/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
  pub user_id: UserId,
  pub count:   i64,
}

/// Body returned by every mutating counter endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
  pub success: bool,
  pub user_id: UserId,
  pub count:   i64,
}

/// Body accepted by `POST /counter/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCountBody {
  pub count:  i64,
  /// Defaults to [`Action::Update`] when omitted.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub action: Option<Action>,
}

/// Body of `GET /activity/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
  pub user_id:    UserId,
  pub activities: Vec<ActivityLogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
  Ok,
  Degraded,
}

/// Body of `GET /health`. Always served with `200 OK`; an unreachable store is
/// reported through `status` and `database_reachable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
  pub status:             HealthStatus,
  pub database_reachable: bool,
  pub timestamp:          DateTime<Utc>,
}

impl HealthReport {
  pub fn new(database_reachable: bool) -> Self {
    Self {
      status: if database_reachable {
        HealthStatus::Ok
      } else {
        HealthStatus::Degraded
      },
      database_reachable,
      timestamp: Utc::now(),
    }
  }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
  /// Machine-readable kind, e.g. `"storage_error"`.
  pub error:   String,
  pub message: String,
}
