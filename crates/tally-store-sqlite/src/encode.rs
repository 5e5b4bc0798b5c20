//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (UTC, microseconds)
//! so that lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use tally_core::{
  activity::ActivityLogEntry,
  counter::{Counter, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `counters` row.
pub struct RawCounter {
  pub user_id:    String,
  pub count:      i64,
  pub updated_at: String,
}

impl RawCounter {
  pub fn into_counter(self) -> Result<Counter> {
    Ok(Counter {
      user_id:    UserId::new(self.user_id)?,
      count:      self.count,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `activity_log` row.
pub struct RawEntry {
  pub id:        i64,
  pub user_id:   String,
  pub action:    String,
  pub value:     i64,
  pub timestamp: String,
}

impl RawEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawEntry {
      id:        row.get(0)?,
      user_id:   row.get(1)?,
      action:    row.get(2)?,
      value:     row.get(3)?,
      timestamp: row.get(4)?,
    })
  }

  pub fn into_entry(self) -> Result<ActivityLogEntry> {
    Ok(ActivityLogEntry {
      id:        self.id,
      user_id:   UserId::new(self.user_id)?,
      action:    self.action.parse()?,
      value:     self.value,
      timestamp: decode_dt(&self.timestamp)?,
    })
  }
}
