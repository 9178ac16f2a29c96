//! Leaderboard pipeline: aggregate in the store, score each actor, rank, and
//! render localised rows.

use std::collections::HashMap;

use futures::future::join_all;
use kaizen_core::{
  aggregate::ActorCount,
  event::{DateRange, EventKind},
  model::{ActorProfile, EmployeeId, Lang},
  rank::{RankedActor, assign_ranks},
  scoring::{ScoredActor, WeightTable, score_actor},
  store::RankingStore,
};
use serde::Serialize;

use crate::cache::TtlCache;

/// The per-actor count column; its JSON key depends on the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tally {
  #[serde(rename = "resolvedCount")]
  Resolved(u64),
  #[serde(rename = "commentCount")]
  Comments(u64),
}

impl Tally {
  fn new(kind: EventKind, n: u64) -> Self {
    match kind {
      EventKind::Resolver => Tally::Resolved(n),
      EventKind::Commenter => Tally::Comments(n),
    }
  }
}

/// One rendered leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
  pub id:               EmployeeId,
  pub display_name:     String,
  pub secondary_name:   Option<String>,
  pub department_label: Option<String>,
  #[serde(flatten)]
  pub count:            Tally,
  pub score:            u64,
  pub rank:             u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardQuery {
  pub kind:  EventKind,
  pub range: Option<DateRange>,
  pub limit: usize,
  pub lang:  Lang,
}

/// Key for cached unfiltered leaderboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
  pub kind:  EventKind,
  pub lang:  Lang,
  pub limit: usize,
}

pub type LeaderboardCache = TtlCache<CacheKey, Vec<RankingRow>>;

/// Compute a leaderboard.
///
/// Failing to aggregate or to load profiles fails the whole computation.
/// Failing to weight a single actor does not: that actor keeps its raw count
/// as its score.
pub async fn compute<S>(store: &S, query: &LeaderboardQuery) -> Result<Vec<RankingRow>, S::Error>
where
  S: RankingStore,
{
  let table = WeightTable::for_kind(query.kind);
  let counts = store.top_actors(query.kind, query.range, query.limit).await?;

  let scored = join_all(
    counts
      .iter()
      .map(|count| score_one(store, table, *count, query.range)),
  )
  .await;
  let ranked = assign_ranks(scored);

  let ids: Vec<EmployeeId> = ranked.iter().map(|r| r.actor_id).collect();
  let profiles: HashMap<EmployeeId, ActorProfile> = store
    .actor_profiles(&ids)
    .await?
    .into_iter()
    .map(|p| (p.employee.id, p))
    .collect();

  Ok(
    ranked
      .into_iter()
      .map(|r| render(r, profiles.get(&r.actor_id), query))
      .collect(),
  )
}

async fn score_one<S>(
  store: &S,
  table: &WeightTable,
  count: ActorCount,
  range: Option<DateRange>,
) -> ScoredActor
where
  S: RankingStore,
{
  let events = match store.actor_events(table.kind, count.actor_id, range).await {
    Ok(events) => events,
    Err(e) => {
      tracing::warn!(
        actor_id = count.actor_id,
        error = %e,
        "could not load events; scoring by raw count"
      );
      return ScoredActor::unweighted(count);
    }
  };

  score_actor(table, count, &events).unwrap_or_else(|e| {
    tracing::warn!(actor_id = count.actor_id, error = %e, "weighting failed; scoring by raw count");
    ScoredActor::unweighted(count)
  })
}

fn render(r: RankedActor, profile: Option<&ActorProfile>, query: &LeaderboardQuery) -> RankingRow {
  let count = Tally::new(query.kind, r.raw_count);
  match profile {
    Some(p) => RankingRow {
      id: r.actor_id,
      display_name: p.employee.name.clone(),
      secondary_name: p.employee.name_secondary.clone(),
      department_label: p.department_label(query.lang).map(str::to_owned),
      count,
      score: r.score,
      rank: r.rank,
    },
    None => {
      tracing::warn!(actor_id = r.actor_id, "ranked actor has no employee record");
      RankingRow {
        id: r.actor_id,
        display_name: r.actor_id.to_string(),
        secondary_name: None,
        department_label: None,
        count,
        score: r.score,
        rank: r.rank,
      }
    }
  }
}
