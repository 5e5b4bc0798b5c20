//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. There is no migration tooling; the
//! version is recorded in `PRAGMA user_version` only.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS counters (
    user_id     TEXT PRIMARY KEY,
    count       INTEGER NOT NULL DEFAULT 0,
    updated_at  TEXT NOT NULL    -- RFC 3339 UTC, microsecond precision
);

-- Append-only. No UPDATE or DELETE is ever issued against this table.
-- user_id is not a foreign key: a reset of an unknown user logs a row
-- without creating a counter.
CREATE TABLE IF NOT EXISTS activity_log (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    action      TEXT NOT NULL
                CHECK (action IN ('update', 'increment', 'decrement', 'reset')),
    value       INTEGER NOT NULL,  -- counter value after the action
    timestamp   TEXT NOT NULL      -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS activity_user_ts_idx
    ON activity_log(user_id, timestamp DESC);

PRAGMA user_version = 1;
";

/// Insert-or-overwrite a counter with an explicit value.
pub const UPSERT_SET: &str = "
INSERT INTO counters (user_id, count, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(user_id) DO UPDATE SET
    count      = excluded.count,
    updated_at = excluded.updated_at";

/// Insert at `?2` or add `?2` to the existing count, in one statement.
pub const UPSERT_STEP: &str = "
INSERT INTO counters (user_id, count, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(user_id) DO UPDATE SET
    count      = count + ?2,
    updated_at = excluded.updated_at
RETURNING count";

/// Zero an existing counter. Touches nothing when the row is absent.
pub const RESET: &str = "
UPDATE counters SET count = 0, updated_at = ?2 WHERE user_id = ?1";

pub const APPEND_ACTIVITY: &str = "
INSERT INTO activity_log (user_id, action, value, timestamp)
VALUES (?1, ?2, ?3, ?4)";

/// Newest first. `id` breaks ties between entries written in the same
/// microsecond.
pub const RECENT_ACTIVITY: &str = "
SELECT id, user_id, action, value, timestamp
FROM activity_log
WHERE user_id = ?1
ORDER BY timestamp DESC, id DESC
LIMIT ?2";
