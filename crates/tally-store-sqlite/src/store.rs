//! [`SqliteStore`] — the SQLite implementation of [`CounterStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tally_core::{
  activity::{ACTIVITY_LIMIT, Action, ActivityLogEntry},
  counter::{Counter, UserId},
  store::CounterStore,
};

use crate::{
  Result,
  encode::{RawCounter, RawEntry, encode_dt},
  schema::{APPEND_ACTIVITY, RECENT_ACTIVITY, RESET, SCHEMA, UPSERT_SET, UPSERT_STEP},
};

// ─── Mutation kinds ──────────────────────────────────────────────────────────

/// How a mutation changes the counter row.
#[derive(Debug, Clone, Copy)]
enum Change {
  /// Overwrite with a value, creating the row if needed.
  Set(i64),
  /// Add a delta atomically, creating the row at the delta if needed.
  Step(i64),
  /// Zero an existing row only.
  Reset,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All clones
/// share one connection thread, so statements from concurrent callers are
/// serialised by that thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Apply `change` to the counter and append the matching activity entry.
  ///
  /// The counter write, the read-back of the resulting count and the log
  /// append share one transaction, so a failure leaves neither behind and the
  /// logged value is always the count this call produced.
  async fn apply(&self, user_id: &UserId, change: Change, action: Action) -> Result<i64> {
    let user_str   = user_id.as_str().to_owned();
    let action_str = action.as_str();

    let count = self
      .conn
      .call(move |conn| {
        // Stamped on the connection thread so timestamps follow write order.
        let now_str = encode_dt(Utc::now());
        let tx = conn.transaction()?;

        let count: i64 = match change {
          Change::Set(value) => {
            tx.execute(UPSERT_SET, rusqlite::params![user_str, value, now_str])?;
            value
          }
          Change::Step(delta) => tx.query_row(
            UPSERT_STEP,
            rusqlite::params![user_str, delta, now_str],
            |row| row.get(0),
          )?,
          Change::Reset => {
            tx.execute(RESET, rusqlite::params![user_str, now_str])?;
            0
          }
        };

        tx.execute(
          APPEND_ACTIVITY,
          rusqlite::params![user_str, action_str, count, now_str],
        )?;
        tx.commit()?;
        Ok(count)
      })
      .await?;

    Ok(count)
  }
}

// ─── CounterStore impl ───────────────────────────────────────────────────────

impl CounterStore for SqliteStore {
  type Error = crate::Error;

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_counter(&self, user_id: &UserId) -> Result<Option<Counter>> {
    let user_str = user_id.as_str().to_owned();

    let raw: Option<RawCounter> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, count, updated_at FROM counters WHERE user_id = ?1",
            rusqlite::params![user_str],
            |row| {
              Ok(RawCounter {
                user_id:    row.get(0)?,
                count:      row.get(1)?,
                updated_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCounter::into_counter).transpose()
  }

  async fn get_count(&self, user_id: &UserId) -> Result<i64> {
    let user_str = user_id.as_str().to_owned();

    let count: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT count FROM counters WHERE user_id = ?1",
            rusqlite::params![user_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(count.unwrap_or(0))
  }

  async fn activity(&self, user_id: &UserId) -> Result<Vec<ActivityLogEntry>> {
    let user_str = user_id.as_str().to_owned();
    let limit    = ACTIVITY_LIMIT as i64;

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(RECENT_ACTIVITY)?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, limit], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn set_count(&self, user_id: &UserId, count: i64, action: Action) -> Result<i64> {
    self.apply(user_id, Change::Set(count), action).await
  }

  async fn increment(&self, user_id: &UserId) -> Result<i64> {
    self.apply(user_id, Change::Step(1), Action::Increment).await
  }

  async fn decrement(&self, user_id: &UserId) -> Result<i64> {
    self.apply(user_id, Change::Step(-1), Action::Decrement).await
  }

  async fn reset(&self, user_id: &UserId) -> Result<i64> {
    self.apply(user_id, Change::Reset, Action::Reset).await
  }
}
