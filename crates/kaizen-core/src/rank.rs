//! Final leaderboard stage: competition ranking.

use serde::{Deserialize, Serialize};

use crate::{model::EmployeeId, scoring::ScoredActor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedActor {
  pub actor_id:  EmployeeId,
  pub raw_count: u64,
  pub score:     u64,
  /// 1-based; tied scores share a rank and leave a gap after them.
  pub rank:      u32,
}

/// Sort by score, highest first, and assign standard competition ranks
/// (10, 10, 8 → 1, 1, 3).
///
/// The sort is stable: actors with equal scores keep their input order.
pub fn assign_ranks(mut scored: Vec<ScoredActor>) -> Vec<RankedActor> {
  scored.sort_by(|a, b| b.score.cmp(&a.score));

  let mut ranked: Vec<RankedActor> = Vec::with_capacity(scored.len());
  for (position, actor) in scored.into_iter().enumerate() {
    let rank = match ranked.last() {
      Some(prev) if prev.score == actor.score => prev.rank,
      _ => position as u32 + 1,
    };
    ranked.push(RankedActor {
      actor_id: actor.actor_id,
      raw_count: actor.raw_count,
      score: actor.score,
      rank,
    });
  }
  ranked
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Duration, TimeZone, Utc};

  use super::*;
  use crate::{
    aggregate::aggregate,
    event::{DateRange, RawEvent, ResolutionEvent},
    model::{IssueStatus, Priority},
    scoring::{RESOLVER_WEIGHTS, score_actor},
  };

  fn scored(actor_id: EmployeeId, score: u64) -> ScoredActor {
    ScoredActor { actor_id, raw_count: score, score }
  }

  fn ranks(ranked: &[RankedActor]) -> Vec<u32> { ranked.iter().map(|r| r.rank).collect() }

  #[test]
  fn empty_input_yields_empty_output() {
    assert!(assign_ranks(vec![]).is_empty());
  }

  #[test]
  fn single_actor_is_first() {
    let ranked = assign_ranks(vec![scored(4, 0)]);
    assert_eq!(ranks(&ranked), vec![1]);
  }

  #[test]
  fn ties_share_rank_and_leave_gap() {
    let ranked = assign_ranks(vec![scored(1, 8), scored(2, 10), scored(3, 10)]);
    assert_eq!(ranked.iter().map(|r| r.actor_id).collect::<Vec<_>>(), vec![2, 3, 1]);
    assert_eq!(ranks(&ranked), vec![1, 1, 3]);
  }

  #[test]
  fn multiple_tie_groups() {
    let ranked = assign_ranks(vec![
      scored(1, 5),
      scored(2, 5),
      scored(3, 5),
      scored(4, 2),
      scored(5, 2),
      scored(6, 1),
    ]);
    assert_eq!(ranks(&ranked), vec![1, 1, 1, 4, 4, 6]);
  }

  #[test]
  fn ranks_follow_scores() {
    let input: Vec<_> = [3u64, 9, 9, 0, 7, 3, 3, 12, 1]
      .iter()
      .enumerate()
      .map(|(i, s)| scored(i as EmployeeId, *s))
      .collect();
    let ranked = assign_ranks(input);
    for pair in ranked.windows(2) {
      let (a, b) = (&pair[0], &pair[1]);
      assert!(a.score >= b.score);
      assert!(a.rank <= b.rank);
      assert_eq!(a.score == b.score, a.rank == b.rank);
    }
  }

  // ── Full pipeline ───────────────────────────────────────────────────────

  fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0).unwrap()
  }

  fn resolution(
    actor_id: EmployeeId,
    priority: Priority,
    created_at: DateTime<Utc>,
    hours_to_resolve: i64,
  ) -> RawEvent {
    RawEvent::Resolver(ResolutionEvent {
      actor_id,
      priority,
      status: IssueStatus::Closed,
      created_at,
      updated_at: created_at + Duration::hours(hours_to_resolve),
    })
  }

  fn run(events: &[RawEvent], range: Option<&DateRange>, limit: usize) -> Vec<RankedActor> {
    let scored = aggregate(events, range, limit)
      .into_iter()
      .map(|count| {
        let own: Vec<RawEvent> = events
          .iter()
          .filter(|e| e.actor_id() == count.actor_id)
          .filter(|e| range.is_none_or(|r| r.contains(e.created_at())))
          .cloned()
          .collect();
        score_actor(&RESOLVER_WEIGHTS, count, &own).unwrap()
      })
      .collect();
    assign_ranks(scored)
  }

  #[test]
  fn golden_five_actor_ranking() {
    let july = at(7, 10);
    let events = vec![
      // Actor 2: four normal-priority, slow → 4 × 2 = 8
      resolution(2, Priority::Normal, july, 72),
      resolution(2, Priority::Normal, july, 72),
      resolution(2, Priority::Normal, july, 72),
      resolution(2, Priority::Normal, july, 72),
      // Actor 1: 5 + 3 + 1.5 + 1 = 10.5 → 11
      resolution(1, Priority::Critical, july, 72),
      resolution(1, Priority::High, july, 72),
      resolution(1, Priority::Low, july, 10),
      resolution(1, Priority::Low, july, 72),
      // Actor 3: 4.5 + 2.4 + 1 = 7.9 → 8
      resolution(3, Priority::High, july, 20),
      resolution(3, Priority::Normal, july, 30),
      resolution(3, Priority::Low, july, 100),
      // Actor 4: 5 + 5 = 10
      resolution(4, Priority::Critical, july, 72),
      resolution(4, Priority::Critical, july, 72),
      // Actor 5: 1 in range, plus a June critical outside it
      resolution(5, Priority::Low, july, 72),
      resolution(5, Priority::Critical, at(6, 15), 1),
      // Actor 6: only outside the window
      resolution(6, Priority::Critical, at(6, 20), 1),
    ];
    let range = DateRange { from: at(7, 1), to: at(7, 31) };

    let ranked = run(&events, Some(&range), 5);

    let summary: Vec<(EmployeeId, u64, u64, u32)> = ranked
      .iter()
      .map(|r| (r.actor_id, r.raw_count, r.score, r.rank))
      .collect();
    assert_eq!(summary, vec![
      (1, 4, 11, 1),
      (4, 2, 10, 2),
      (2, 4, 8, 3),
      (3, 3, 8, 3),
      (5, 1, 1, 5),
    ]);
  }

  #[test]
  fn equal_unit_weight_resolvers_keep_raw_counts() {
    let created = at(8, 1);
    let mut events = Vec::new();
    for (actor, count) in [(1, 10), (2, 10), (3, 7)] {
      for _ in 0..count {
        events.push(resolution(actor, Priority::Low, created, 60));
      }
    }
    let ranked = run(&events, None, 5);
    let summary: Vec<(EmployeeId, u64, u32)> =
      ranked.iter().map(|r| (r.actor_id, r.score, r.rank)).collect();
    assert_eq!(summary, vec![(1, 10, 1), (2, 10, 1), (3, 7, 3)]);
  }
}
