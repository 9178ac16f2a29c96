//! First leaderboard stage: count events per actor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  event::{DateRange, RawEvent},
  model::EmployeeId,
};

/// An actor together with the number of events counted for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorCount {
  pub actor_id:  EmployeeId,
  pub raw_count: u64,
}

/// Group `events` by actor and return the `limit` actors with the most
/// events, highest first.
///
/// Only events inside `range` are counted when a range is given. Actors with
/// no counted events do not appear at all. Ties keep the order in which each
/// actor was first seen.
pub fn aggregate(
  events: &[RawEvent],
  range: Option<&DateRange>,
  limit: usize,
) -> Vec<ActorCount> {
  let mut counts: Vec<ActorCount> = Vec::new();
  let mut index: HashMap<EmployeeId, usize> = HashMap::new();

  for event in events {
    if let Some(range) = range
      && !range.contains(event.created_at())
    {
      continue;
    }
    let slot = *index.entry(event.actor_id()).or_insert_with(|| {
      counts.push(ActorCount { actor_id: event.actor_id(), raw_count: 0 });
      counts.len() - 1
    });
    counts[slot].raw_count += 1;
  }

  // `sort_by` is stable, so first-seen order survives among equal counts.
  counts.sort_by(|a, b| b.raw_count.cmp(&a.raw_count));
  counts.truncate(limit);
  counts
}
