//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tally_core::{activity::ActivityLogEntry, counter::UserId, wire::HealthReport};

use crate::client::ApiClient;

// ─── Connection ───────────────────────────────────────────────────────────────

/// What the last health check said about the service and its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
  /// No health check has completed yet.
  Unknown,
  Connected,
  /// The store reported unreachable, or the service itself could not be
  /// reached.
  Disconnected,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Identifier for this session; sent with every request.
  pub user_id: UserId,

  /// Last count confirmed by the server. `None` until the first load
  /// succeeds; never cleared by a failed request.
  pub count: Option<i64>,

  /// Whether the initial count load is still in flight.
  pub loading: bool,

  pub connection: Connection,

  /// Most recent health report, if the service answered.
  pub health: Option<HealthReport>,

  /// Activity log for `user_id`, newest first.
  pub activity: Vec<ActivityLogEntry>,

  /// Digits typed after `=`; `Some` while entering a value to set.
  pub input: Option<String>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, user_id: UserId) -> Self {
    Self {
      user_id,
      count: None,
      loading: true,
      connection: Connection::Unknown,
      health: None,
      activity: Vec::new(),
      input: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Initial load: count, health and activity. Failures are reported in the
  /// status bar and never abort the UI.
  pub async fn load(&mut self) {
    self.status_msg = "Loading…".into();
    self.loading = true;
    let count = self.client.get_count(&self.user_id).await;
    self.loading = false;
    match count {
      Ok(c) => {
        self.count = Some(c);
        self.status_msg.clear();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    self.check_health().await;
    self.refresh_activity().await;
  }

  /// Query `/health` and update the connection indicator.
  pub async fn check_health(&mut self) {
    match self.client.health().await {
      Ok(report) => {
        self.connection = if report.database_reachable {
          Connection::Connected
        } else {
          Connection::Disconnected
        };
        self.health = Some(report);
      }
      Err(_) => {
        self.connection = Connection::Disconnected;
        self.health = None;
      }
    }
  }

  /// Reload the activity log. Keeps the previous list on failure.
  pub async fn refresh_activity(&mut self) {
    match self.client.activity(&self.user_id).await {
      Ok(entries) => self.activity = entries,
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  pub async fn increment(&mut self) {
    let result = self.client.increment(&self.user_id).await;
    self.apply("increment", result).await;
  }

  pub async fn decrement(&mut self) {
    let result = self.client.decrement(&self.user_id).await;
    self.apply("decrement", result).await;
  }

  pub async fn reset(&mut self) {
    let result = self.client.reset(&self.user_id).await;
    self.apply("reset", result).await;
  }

  pub async fn set_count(&mut self, value: i64) {
    let result = self.client.set_count(&self.user_id, value, None).await;
    self.apply("set", result).await;
  }

  /// Record the outcome of a mutation. On failure the displayed count is left
  /// as it was.
  async fn apply(&mut self, what: &str, result: anyhow::Result<i64>) {
    match result {
      Ok(c) => {
        self.count = Some(c);
        self.status_msg.clear();
        self.refresh_activity().await;
      }
      Err(e) => self.status_msg = format!("{what} failed: {e:#}"),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.input.is_some() {
      self.handle_input_key(key).await;
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('+') | KeyCode::Char('k') | KeyCode::Up => self.increment().await,
      KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => self.decrement().await,
      KeyCode::Char('r') => self.reset().await,
      KeyCode::Char('a') => self.refresh_activity().await,
      KeyCode::Char('h') => self.check_health().await,
      KeyCode::Char('=') => {
        self.input = Some(String::new());
        self.status_msg.clear();
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_input_key(&mut self, key: KeyEvent) {
    let Some(buf) = self.input.as_mut() else { return };
    match key.code {
      KeyCode::Esc => self.input = None,
      KeyCode::Backspace => {
        buf.pop();
      }
      KeyCode::Char('-') if buf.is_empty() => buf.push('-'),
      KeyCode::Char(c) if c.is_ascii_digit() => buf.push(c),
      KeyCode::Enter => {
        let text = self.input.take().unwrap_or_default();
        match text.parse::<i64>() {
          Ok(value) => self.set_count(value).await,
          Err(_) => self.status_msg = format!("not a number: {text:?}"),
        }
      }
      _ => {}
    }
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
