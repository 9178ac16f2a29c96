//! Second leaderboard stage: weight each actor's raw count.
//!
//! A single scorer serves both leaderboards; what differs between them is
//! captured in a [`WeightTable`]. Every event starts at a baseline of `1`
//! (already counted in the raw count) and contributes its weighted delta
//! above that baseline.

use chrono::{DateTime, Duration, Utc};

use crate::{
  Error, Result,
  aggregate::ActorCount,
  event::{EventKind, RawEvent},
  model::{EmployeeId, IssueStatus, Priority},
};

/// Per-status multipliers. Statuses not listed weigh `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusWeights {
  pub done:     f64,
  pub verified: f64,
  pub closed:   f64,
}

impl StatusWeights {
  pub fn weight(&self, status: IssueStatus) -> f64 {
    match status {
      IssueStatus::Done => self.done,
      IssueStatus::Verified => self.verified,
      IssueStatus::Closed => self.closed,
      IssueStatus::Open | IssueStatus::InProgress => 1.0,
    }
  }
}

/// Bonus for issues resolved quickly after being reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBonus {
  pub within_24h: f64,
  pub within_48h: f64,
}

impl SpeedBonus {
  pub fn weight(&self, created_at: DateTime<Utc>, resolved_at: DateTime<Utc>) -> f64 {
    let elapsed = resolved_at - created_at;
    if elapsed <= Duration::hours(24) {
      self.within_24h
    } else if elapsed <= Duration::hours(48) {
      self.within_48h
    } else {
      1.0
    }
  }
}

/// Multipliers applied by the scorer for one leaderboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTable {
  pub kind:     EventKind,
  /// Indexed by priority tier minus one.
  pub priority: [f64; 4],
  pub status:   Option<StatusWeights>,
  pub speed:    Option<SpeedBonus>,
}

/// Weights for the issue-resolver leaderboard.
pub const RESOLVER_WEIGHTS: WeightTable = WeightTable {
  kind:     EventKind::Resolver,
  priority: [5.0, 3.0, 2.0, 1.0],
  status:   None,
  speed:    Some(SpeedBonus { within_24h: 1.5, within_48h: 1.2 }),
};

/// Weights for the commenter leaderboard.
pub const COMMENTER_WEIGHTS: WeightTable = WeightTable {
  kind:     EventKind::Commenter,
  priority: [3.0, 2.0, 1.0, 0.5],
  status:   Some(StatusWeights { done: 1.5, verified: 1.2, closed: 1.1 }),
  speed:    None,
};

impl WeightTable {
  pub fn for_kind(kind: EventKind) -> &'static WeightTable {
    match kind {
      EventKind::Resolver => &RESOLVER_WEIGHTS,
      EventKind::Commenter => &COMMENTER_WEIGHTS,
    }
  }

  pub fn priority_weight(&self, priority: Priority) -> f64 {
    self.priority[usize::from(priority.tier() - 1)]
  }

  /// The weighted value of a single event.
  pub fn event_score(&self, event: &RawEvent) -> Result<f64> {
    if event.kind() != self.kind {
      return Err(Error::EventKindMismatch { event: event.kind(), table: self.kind });
    }

    let mut value = self.priority_weight(event.priority());
    if let Some(status) = &self.status {
      value *= status.weight(event.status());
    }
    if let (Some(speed), RawEvent::Resolver(resolved)) = (&self.speed, event) {
      value *= speed.weight(resolved.created_at, resolved.updated_at);
    }
    Ok(value)
  }

  /// Weighted score for an actor with `raw_count` counted events.
  ///
  /// The result is rounded to the nearest integer and never negative.
  pub fn score(&self, raw_count: u64, events: &[RawEvent]) -> Result<u64> {
    let mut score = raw_count as f64;
    for event in events {
      score += self.event_score(event)? - 1.0;
    }
    Ok(score.round().max(0.0) as u64)
  }
}

/// An actor with a weighted score, not yet ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredActor {
  pub actor_id:  EmployeeId,
  pub raw_count: u64,
  pub score:     u64,
}

impl ScoredActor {
  /// Score from the raw count alone; used when weighting is unavailable.
  pub fn unweighted(count: ActorCount) -> Self {
    ScoredActor {
      actor_id:  count.actor_id,
      raw_count: count.raw_count,
      score:     count.raw_count,
    }
  }
}

/// Score `count` from the actor's `events`. Callers decide what to do when
/// weighting fails; see [`ScoredActor::unweighted`].
pub fn score_actor(
  table: &WeightTable,
  count: ActorCount,
  events: &[RawEvent],
) -> Result<ScoredActor> {
  let score = table.score(count.raw_count, events)?;
  Ok(ScoredActor { actor_id: count.actor_id, raw_count: count.raw_count, score })
}
