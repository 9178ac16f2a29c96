//! Handlers for `/rankings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/rankings/resolvers` | `?from&to&lang&limit` |
//! | `GET`  | `/rankings/commenters` | `?from&to&lang&limit&refresh`; unfiltered results are cached |
//!
//! `from`/`to` only filter when both parse; malformed values are ignored
//! rather than rejected. A `limit` that is not a non-negative integer falls
//! back to the default.

use axum::{
  Json,
  extract::{Query, State},
};
use kaizen_core::{
  event::{DateRange, EventKind},
  model::Lang,
  store::RankingStore,
};
use serde::Deserialize;

use crate::{
  RankingState,
  error::ApiError,
  leaderboard::{self, CacheKey, LeaderboardQuery, RankingRow},
};

#[derive(Debug, Deserialize, Default)]
pub struct RankingParams {
  pub from:    Option<String>,
  pub to:      Option<String>,
  /// `ko` (default), `en` or `th`.
  pub lang:    Option<String>,
  pub limit:   Option<String>,
  /// `true` or `1` skips the cache read.
  pub refresh: Option<String>,
}

impl RankingParams {
  fn query<S>(&self, kind: EventKind, state: &RankingState<S>) -> LeaderboardQuery {
    LeaderboardQuery {
      kind,
      range: DateRange::parse_lossy(self.from.as_deref(), self.to.as_deref()),
      limit: state.config.clamp_limit(self.limit()),
      lang: Lang::parse_lossy(self.lang.as_deref()),
    }
  }

  fn limit(&self) -> Option<usize> {
    self.limit.as_deref().and_then(|l| l.trim().parse().ok())
  }

  fn refresh(&self) -> bool {
    matches!(self.refresh.as_deref().map(str::trim), Some("true" | "1"))
  }
}

/// `GET /rankings/resolvers`
pub async fn resolvers<S>(
  State(state): State<RankingState<S>>,
  Query(params): Query<RankingParams>,
) -> Result<Json<Vec<RankingRow>>, ApiError>
where
  S: RankingStore,
{
  let query = params.query(EventKind::Resolver, &state);
  let rows = leaderboard::compute(state.store.as_ref(), &query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `GET /rankings/commenters`
///
/// Unfiltered requests go through the cache. When recomputing fails and an
/// earlier result exists for the same key, that result is served instead of
/// an error, even if it has expired.
pub async fn commenters<S>(
  State(state): State<RankingState<S>>,
  Query(params): Query<RankingParams>,
) -> Result<Json<Vec<RankingRow>>, ApiError>
where
  S: RankingStore,
{
  let query = params.query(EventKind::Commenter, &state);
  let key = query.range.is_none().then_some(CacheKey {
    kind:  query.kind,
    lang:  query.lang,
    limit: query.limit,
  });

  if let Some(key) = &key
    && !params.refresh()
    && let Some(rows) = state.cache.get(key)
  {
    return Ok(Json(rows));
  }

  match leaderboard::compute(state.store.as_ref(), &query).await {
    Ok(rows) => {
      if let Some(key) = key {
        state.cache.insert(key, rows.clone());
      }
      Ok(Json(rows))
    }
    Err(e) => match key.and_then(|k| state.cache.get_stale(&k)) {
      Some(rows) => {
        tracing::warn!(error = %e, "commenter ranking failed; serving cached result");
        Ok(Json(rows))
      }
      None => Err(ApiError::store(e)),
    },
  }
}
