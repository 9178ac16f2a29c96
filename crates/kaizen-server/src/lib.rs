//! HTTP server for Kaizen.
//!
//! Wraps the [`kaizen_api`] routers with Basic auth and request tracing and
//! mounts them under `/api`.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, middleware};
use kaizen_api::{RankingConfig, RankingState};
use kaizen_core::store::{IssueStore, RankingStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `KAIZEN_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Lifetime of the cached unfiltered commenter leaderboard.
  #[serde(default = "default_cache_ttl_secs")]
  pub cache_ttl_secs:     u64,
  #[serde(default = "default_limit")]
  pub default_limit:      usize,
  #[serde(default = "default_max_limit")]
  pub max_limit:          usize,
}

fn default_cache_ttl_secs() -> u64 { kaizen_api::DEFAULT_CACHE_TTL.as_secs() }
fn default_limit() -> usize { RankingConfig::default().default_limit }
fn default_max_limit() -> usize { RankingConfig::default().max_limit }

impl ServerConfig {
  pub fn cache_ttl(&self) -> Duration { Duration::from_secs(self.cache_ttl_secs) }

  pub fn ranking(&self) -> RankingConfig {
    RankingConfig { default_limit: self.default_limit, max_limit: self.max_limit }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything [`router`] needs to serve requests.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    let auth = AuthConfig {
      username:      config.auth_username.clone(),
      password_hash: config.auth_password_hash.clone(),
    };
    Self { store, config: Arc::new(config), auth: Arc::new(auth) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server [`Router`]: the JSON API under `/api`, behind Basic auth.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RankingStore + IssueStore + 'static,
{
  let rankings = RankingState::new(state.store, state.config.cache_ttl(), state.config.ranking());
  let api = kaizen_api::api_router(rankings)
    .layer(middleware::from_fn_with_state(state.auth, require_auth));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use kaizen_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_app(password: &str) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    router(AppState::new(Arc::new(store), ServerConfig {
      host:               "127.0.0.1".to_string(),
      port:               8080,
      store_path:         PathBuf::from(":memory:"),
      auth_username:      "lead".to_string(),
      auth_password_hash: hash,
      cache_ttl_secs:     60,
      default_limit:      5,
      max_limit:          50,
    }))
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn rankings_require_auth() {
    let app = make_app("secret").await;
    let resp = app
      .oneshot(Request::builder().uri("/api/rankings/resolvers").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
      "Basic realm=\"kaizen\""
    );
  }

  #[tokio::test]
  async fn wrong_password_is_401() {
    let app = make_app("secret").await;
    let resp = app
      .oneshot(
        Request::builder()
          .uri("/api/rankings/commenters")
          .header(header::AUTHORIZATION, auth_header("lead", "guess"))
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn writes_require_auth() {
    let app = make_app("secret").await;
    let resp = app
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/api/departments")
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(json!({ "name": "Paint", "label": "도장" }).to_string()))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn authenticated_requests_reach_the_api() {
    let app = make_app("secret").await;
    let auth = auth_header("lead", "secret");

    let resp = app
      .clone()
      .oneshot(
        Request::builder()
          .uri("/api/rankings/resolvers")
          .header(header::AUTHORIZATION, &auth)
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));

    let resp = app
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/api/employees")
          .header(header::AUTHORIZATION, &auth)
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(json!({ "name": "Somchai" }).to_string()))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["name"], "Somchai");
  }

  #[test]
  fn config_defaults_apply() {
    let cfg: ServerConfig = serde_json::from_value(json!({
      "host": "0.0.0.0",
      "port": 8080,
      "store_path": "kaizen.db",
      "auth_username": "lead",
      "auth_password_hash": "$argon2id$...",
    }))
    .unwrap();
    assert_eq!(cfg.cache_ttl(), Duration::from_secs(1800));
    assert_eq!(cfg.ranking(), RankingConfig { default_limit: 5, max_limit: 50 });
  }
}
