//! Raw ranking events and the date window used to filter them.
//!
//! A [`RawEvent`] is a read-only snapshot of one thing an actor did that a
//! leaderboard counts: resolving an issue, or commenting on one.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EmployeeId, IssueStatus, Priority};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Which leaderboard an event (or a weight table) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Resolver,
  Commenter,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// An issue resolved by `actor_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEvent {
  pub actor_id:   EmployeeId,
  pub priority:   Priority,
  pub status:     IssueStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A comment written by `actor_id`, carrying its parent issue's tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEvent {
  pub actor_id:   EmployeeId,
  pub priority:   Priority,
  pub status:     IssueStatus,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawEvent {
  Resolver(ResolutionEvent),
  Commenter(CommentEvent),
}

impl RawEvent {
  pub fn kind(&self) -> EventKind {
    match self {
      RawEvent::Resolver(_) => EventKind::Resolver,
      RawEvent::Commenter(_) => EventKind::Commenter,
    }
  }

  pub fn actor_id(&self) -> EmployeeId {
    match self {
      RawEvent::Resolver(e) => e.actor_id,
      RawEvent::Commenter(e) => e.actor_id,
    }
  }

  pub fn priority(&self) -> Priority {
    match self {
      RawEvent::Resolver(e) => e.priority,
      RawEvent::Commenter(e) => e.priority,
    }
  }

  pub fn status(&self) -> IssueStatus {
    match self {
      RawEvent::Resolver(e) => e.status,
      RawEvent::Commenter(e) => e.status,
    }
  }

  /// The timestamp date windows are applied to.
  pub fn created_at(&self) -> DateTime<Utc> {
    match self {
      RawEvent::Resolver(e) => e.created_at,
      RawEvent::Commenter(e) => e.created_at,
    }
  }
}

// ─── Date window ─────────────────────────────────────────────────────────────

/// A closed interval `[from, to]`; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub from: DateTime<Utc>,
  pub to:   DateTime<Utc>,
}

impl DateRange {
  /// Build a window only when both bounds are present. A single bound
  /// disables filtering altogether.
  pub fn from_bounds(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> Option<Self> {
    match (from, to) {
      (Some(from), Some(to)) => Some(DateRange { from, to }),
      _ => None,
    }
  }

  /// Parse raw query values. Malformed bounds are treated as absent, which in
  /// turn disables filtering.
  pub fn parse_lossy(from: Option<&str>, to: Option<&str>) -> Option<Self> {
    Self::from_bounds(from.and_then(parse_instant), to.and_then(parse_instant))
  }

  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.from <= at && at <= self.to
  }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC, or a
/// bare `YYYY-MM-DD` taken as midnight UTC.
///
/// Instants outside years 0000-9999 are rejected: stored timestamps compare
/// as fixed-width text, which a signed or five-digit year would break.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
  parse_any(s.trim()).filter(|dt| (0..=9999).contains(&dt.year()))
}

fn parse_any(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(naive.and_utc());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}
