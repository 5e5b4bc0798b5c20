//! Activity log entries: the append-only audit trail of counter mutations.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, counter::UserId};

/// Maximum number of entries returned by a single activity read.
pub const ACTIVITY_LIMIT: usize = 50;

/// The kind of mutation an [`ActivityLogEntry`] records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
  /// An explicit set of the counter to a caller-supplied value.
  #[default]
  Update,
  Increment,
  Decrement,
  Reset,
}

impl Action {
  pub fn as_str(self) -> &'static str {
    match self {
      Action::Update => "update",
      Action::Increment => "increment",
      Action::Decrement => "decrement",
      Action::Reset => "reset",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.pad(self.as_str()) }
}

impl FromStr for Action {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "update" => Ok(Action::Update),
      "increment" => Ok(Action::Increment),
      "decrement" => Ok(Action::Decrement),
      "reset" => Ok(Action::Reset),
      other => Err(Error::UnknownAction(other.to_owned())),
    }
  }
}

/// One immutable audit record.
///
/// `value` is the counter's value *after* `action` was applied. `timestamp`
/// is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
  pub id:        i64,
  pub user_id:   UserId,
  pub action:    Action,
  pub value:     i64,
  pub timestamp: DateTime<Utc>,
}
