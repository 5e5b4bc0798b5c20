//! Per-session user identity.
//!
//! Each run of the client picks a fresh random identifier. It is not
//! persisted, and uniqueness is probabilistic only.

use tally_core::counter::UserId;
use uuid::Uuid;

/// Length of the random part of a session id.
const SUFFIX_LEN: usize = 9;

/// Generate a new `user-xxxxxxxxx` identifier.
pub fn new_user_id() -> tally_core::Result<UserId> {
  let random = Uuid::new_v4().simple().to_string();
  UserId::new(format!("user-{}", &random[..SUFFIX_LEN]))
}
