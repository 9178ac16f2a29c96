//! JSON REST API for Kaizen.
//!
//! Exposes axum [`Router`]s backed by any store implementing the
//! [`kaizen_core::store`] traits. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kaizen_api::api_router(state))
//! ```

pub mod cache;
pub mod directory;
pub mod error;
pub mod issues;
pub mod leaderboard;
pub mod rankings;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use kaizen_core::store::{IssueStore, RankingStore};

pub use error::ApiError;
use leaderboard::LeaderboardCache;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Limits applied to the `limit` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
  pub default_limit: usize,
  pub max_limit:     usize,
}

impl Default for RankingConfig {
  fn default() -> Self { Self { default_limit: 5, max_limit: 50 } }
}

impl RankingConfig {
  /// The requested limit, or the default, clamped to `1..=max_limit`.
  pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
    requested
      .unwrap_or(self.default_limit)
      .clamp(1, self.max_limit.max(1))
  }
}

/// Default lifetime of a cached unfiltered leaderboard.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

// ─── State ────────────────────────────────────────────────────────────────────

/// State for the ranking handlers.
pub struct RankingState<S> {
  pub store:  Arc<S>,
  pub cache:  Arc<LeaderboardCache>,
  pub config: RankingConfig,
}

impl<S> RankingState<S> {
  pub fn new(store: Arc<S>, cache_ttl: Duration, config: RankingConfig) -> Self {
    Self { store, cache: Arc::new(LeaderboardCache::new(cache_ttl)), config }
  }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for RankingState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      cache:  self.cache.clone(),
      config: self.config,
    }
  }
}

// ─── Routers ──────────────────────────────────────────────────────────────────

/// Ranking endpoints only; needs nothing but read access.
pub fn rankings_router<S>(state: RankingState<S>) -> Router<()>
where
  S: RankingStore + 'static,
{
  Router::new()
    .route("/rankings/resolvers", get(rankings::resolvers::<S>))
    .route("/rankings/commenters", get(rankings::commenters::<S>))
    .with_state(state)
}

/// Directory and issue endpoints.
pub fn issues_router<S>(store: Arc<S>) -> Router<()>
where
  S: IssueStore + 'static,
{
  Router::new()
    // Directory
    .route(
      "/departments",
      get(directory::list_departments::<S>).post(directory::create_department::<S>),
    )
    .route("/employees", post(directory::create_employee::<S>))
    .route("/employees/{id}", get(directory::get_employee::<S>))
    // Issues
    .route("/issues", post(issues::create::<S>))
    .route("/issues/{id}", get(issues::get_one::<S>))
    .route("/issues/{id}/status", post(issues::change_status::<S>))
    .route("/issues/{id}/comments", post(issues::add_comment::<S>))
    .with_state(store)
}

/// Build the full API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: RankingState<S>) -> Router<()>
where
  S: RankingStore + IssueStore + 'static,
{
  let store = state.store.clone();
  rankings_router(state).merge(issues_router(store))
}
