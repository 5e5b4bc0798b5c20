//! HTTP server assembly for Tally.
//!
//! Loads [`ServerConfig`], wraps the [`tally_api`] router in CORS and request
//! tracing layers, and mounts it under [`API_PREFIX`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
};
use serde::Deserialize;
use tally_core::store::CounterStore;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

/// Path prefix the API router is nested under.
pub const API_PREFIX: &str = "/api";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Read from an optional TOML file, then overridden by `TALLY_*` environment
/// variables (`TALLY_PORT=8080`, `TALLY_CORS_ORIGINS=http://a,http://b`).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Allowed CORS origins; `"*"` allows any.
  pub cors_origins: Vec<String>,
}

impl ServerConfig {
  pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 5000)?
      .set_default("store_path", "tally.db")?
      .set_default("cors_origins", vec!["*"])?;

    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path).required(false));
    }

    builder
      .add_source(
        config::Environment::with_prefix("TALLY")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("cors_origins"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the API under [`API_PREFIX`] plus
/// tracing and CORS middleware.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: CounterStore + 'static,
{
  Router::new()
    .nest(API_PREFIX, tally_api::api_router(store))
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
  if origins.iter().any(|o| o == "*") {
    return CorsLayer::new()
      .allow_origin(Any)
      .allow_methods(Any)
      .allow_headers(Any);
  }

  let origins: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| match o.parse() {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(origin = %o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods([Method::GET, Method::POST])
    .allow_headers([header::CONTENT_TYPE])
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────
