//! The `CounterStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`).
//! Higher layers (`tally-api`, `tally-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  activity::{Action, ActivityLogEntry},
  counter::{Counter, UserId},
};

/// Abstraction over a Tally storage backend.
///
/// Every mutating method updates the counter *and* appends exactly one
/// [`ActivityLogEntry`] whose `value` is the counter's post-mutation count.
/// The store is the source of truth on every call; implementations must not
/// serve counts from an in-process cache.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CounterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run a trivial round-trip query against the backing store.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Return the persisted counter row for `user_id`, or `None` if the user
  /// has never written.
  fn get_counter<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<Option<Counter>, Self::Error>> + Send + 'a;

  /// Return the current count, or `0` if no row exists. Never creates a row.
  fn get_count<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Return up to [`ACTIVITY_LIMIT`](crate::activity::ACTIVITY_LIMIT) of the
  /// most recent entries for `user_id`, newest first.
  fn activity<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<Vec<ActivityLogEntry>, Self::Error>> + Send + 'a;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Upsert the counter to `count` and log it under `action`.
  fn set_count<'a>(
    &'a self,
    user_id: &'a UserId,
    count: i64,
    action: Action,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Atomically add one, creating the row at `1` if absent.
  fn increment<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Atomically subtract one, creating the row at `-1` if absent.
  fn decrement<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Set an existing counter to zero. Does not create a row for an unknown
  /// user, but always logs a `reset` entry with value `0`.
  fn reset<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;
}
