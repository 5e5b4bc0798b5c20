//! Integration tests for `SqliteStore` against an in-memory database.

use tally_core::{
  activity::{ACTIVITY_LIMIT, Action},
  counter::UserId,
  store::CounterStore,
};
use tokio::task::JoinSet;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn user(id: &str) -> UserId { UserId::new(id).unwrap() }

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_succeeds_on_open_store() {
  let s = store().await;
  s.ping().await.unwrap();
}

#[tokio::test]
async fn get_count_on_unknown_user_is_zero_without_creating_row() {
  let s = store().await;
  let u = user("never-seen");

  assert_eq!(s.get_count(&u).await.unwrap(), 0);
  assert!(s.get_counter(&u).await.unwrap().is_none());
  assert!(s.activity(&u).await.unwrap().is_empty());
}

#[tokio::test]
async fn store_reopens_on_disk_with_existing_rows() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("tally.db");
  let u    = user("persistent");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.set_count(&u, 9, Action::Update).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.get_count(&u).await.unwrap(), 9);
  assert_eq!(s.activity(&u).await.unwrap().len(), 1);
}

// ─── Increment / decrement ───────────────────────────────────────────────────

#[tokio::test]
async fn sequential_increments_count_and_log_in_order() {
  let s = store().await;
  let u = user("inc");
  let n = 7;

  for expected in 1..=n {
    assert_eq!(s.increment(&u).await.unwrap(), expected);
  }
  assert_eq!(s.get_count(&u).await.unwrap(), n);

  let log = s.activity(&u).await.unwrap();
  assert_eq!(log.len(), n as usize);
  assert!(log.iter().all(|e| e.action == Action::Increment));

  // Newest first, so reversed order is call order.
  let values: Vec<i64> = log.iter().rev().map(|e| e.value).collect();
  assert_eq!(values, (1..=n).collect::<Vec<_>>());
}

#[tokio::test]
async fn first_increment_creates_row_at_one() {
  let s = store().await;
  let u = user("fresh-inc");

  assert_eq!(s.increment(&u).await.unwrap(), 1);
  let counter = s.get_counter(&u).await.unwrap().unwrap();
  assert_eq!(counter.count, 1);
  assert_eq!(counter.user_id, u);
}

#[tokio::test]
async fn decrement_from_fresh_goes_negative() {
  let s = store().await;
  let u = user("fresh-dec");

  assert_eq!(s.decrement(&u).await.unwrap(), -1);
  assert_eq!(s.decrement(&u).await.unwrap(), -2);
  assert_eq!(s.get_count(&u).await.unwrap(), -2);

  let log = s.activity(&u).await.unwrap();
  assert_eq!(log.len(), 2);
  assert_eq!(log[0].action, Action::Decrement);
  assert_eq!(log[0].value, -2);
  assert_eq!(log[1].value, -1);
}

#[tokio::test]
async fn increment_and_decrement_interleave() {
  let s = store().await;
  let u = user("mixed");

  s.increment(&u).await.unwrap();
  s.increment(&u).await.unwrap();
  s.decrement(&u).await.unwrap();
  assert_eq!(s.get_count(&u).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_increments_lose_no_updates() {
  let s = store().await;
  let u = user("racy");
  s.set_count(&u, 100, Action::Update).await.unwrap();

  let n = 32;
  let mut set = JoinSet::new();
  for _ in 0..n {
    let s = s.clone();
    let u = u.clone();
    set.spawn(async move { s.increment(&u).await });
  }

  let mut seen = Vec::new();
  while let Some(res) = set.join_next().await {
    seen.push(res.unwrap().unwrap());
  }

  assert_eq!(seen.len(), n);
  assert_eq!(s.get_count(&u).await.unwrap(), 100 + n as i64);

  // Each call observed a distinct post-increment value.
  seen.sort_unstable();
  assert_eq!(seen, (101..=100 + n as i64).collect::<Vec<_>>());
}

#[tokio::test]
async fn increment_past_max_fails_and_rolls_back() {
  let s = store().await;
  let u = user("top");
  s.set_count(&u, i64::MAX, Action::Update).await.unwrap();

  assert!(s.increment(&u).await.is_err());
  assert_eq!(s.get_count(&u).await.unwrap(), i64::MAX);
  assert_eq!(s.activity(&u).await.unwrap().len(), 1);
}

#[tokio::test]
async fn decrement_past_min_fails_and_rolls_back() {
  let s = store().await;
  let u = user("bottom");
  s.set_count(&u, i64::MIN, Action::Update).await.unwrap();

  assert!(s.decrement(&u).await.is_err());
  assert_eq!(s.get_count(&u).await.unwrap(), i64::MIN);
  assert_eq!(s.activity(&u).await.unwrap().len(), 1);
}

#[tokio::test]
async fn timestamps_follow_write_order_under_concurrency() {
  let s = store().await;
  let u = user("stamped");

  let mut set = JoinSet::new();
  for _ in 0..16 {
    let s = s.clone();
    let u = u.clone();
    set.spawn(async move { s.increment(&u).await });
  }
  while let Some(res) = set.join_next().await {
    res.unwrap().unwrap();
  }

  // Newest first by id; each entry's value and timestamp must agree with it.
  let log = s.activity(&u).await.unwrap();
  assert!(log.windows(2).all(|w| w[0].id > w[1].id));
  assert!(log.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
  assert!(log.windows(2).all(|w| w[0].value > w[1].value));
}

// ─── Reset ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_unknown_user_logs_without_creating_row() {
  let s = store().await;
  let u = user("ghost");

  assert_eq!(s.reset(&u).await.unwrap(), 0);
  assert!(s.get_counter(&u).await.unwrap().is_none());

  let log = s.activity(&u).await.unwrap();
  assert_eq!(log.len(), 1);
  assert_eq!(log[0].action, Action::Reset);
  assert_eq!(log[0].value, 0);
}

#[tokio::test]
async fn reset_existing_user_zeroes_counter() {
  let s = store().await;
  let u = user("resettable");

  s.set_count(&u, -15, Action::Update).await.unwrap();
  assert_eq!(s.reset(&u).await.unwrap(), 0);
  assert_eq!(s.get_count(&u).await.unwrap(), 0);
  assert!(s.get_counter(&u).await.unwrap().is_some());
}

// ─── Set ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_count_round_trips_any_value() {
  let s = store().await;
  let u = user("setter");

  for value in [42, 0, -1, -987_654_321, i64::MAX, i64::MIN] {
    assert_eq!(s.set_count(&u, value, Action::Update).await.unwrap(), value);
    assert_eq!(s.get_count(&u).await.unwrap(), value);
  }
}

#[tokio::test]
async fn set_count_logs_requested_action() {
  let s = store().await;
  let u = user("labelled");

  s.set_count(&u, 42, Action::Update).await.unwrap();
  s.set_count(&u, 5, Action::Reset).await.unwrap();

  let log = s.activity(&u).await.unwrap();
  assert_eq!(log[0].action, Action::Reset);
  assert_eq!(log[0].value, 5);
  assert_eq!(log[1].action, Action::Update);
  assert_eq!(log[1].value, 42);
}

#[tokio::test]
async fn set_count_then_increment_continues_from_set_value() {
  let s = store().await;
  let u = user("continue");

  s.set_count(&u, 10, Action::Update).await.unwrap();
  assert_eq!(s.increment(&u).await.unwrap(), 11);
}

// ─── Activity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn activity_is_capped_and_newest_first() {
  let s = store().await;
  let u = user("busy");
  let n = ACTIVITY_LIMIT as i64 + 10;

  for _ in 0..n {
    s.increment(&u).await.unwrap();
  }

  let log = s.activity(&u).await.unwrap();
  assert_eq!(log.len(), ACTIVITY_LIMIT);
  assert_eq!(log[0].value, n);
  assert_eq!(log[ACTIVITY_LIMIT - 1].value, n - ACTIVITY_LIMIT as i64 + 1);
  assert!(log.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
  assert!(log.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
async fn activity_is_scoped_per_user() {
  let s = store().await;
  let (a, b) = (user("alice"), user("bob"));

  s.increment(&a).await.unwrap();
  s.increment(&a).await.unwrap();
  s.decrement(&b).await.unwrap();

  let log_a = s.activity(&a).await.unwrap();
  let log_b = s.activity(&b).await.unwrap();
  assert_eq!(log_a.len(), 2);
  assert_eq!(log_b.len(), 1);
  assert!(log_a.iter().all(|e| e.user_id == a));
  assert_eq!(s.get_count(&b).await.unwrap(), -1);
}
