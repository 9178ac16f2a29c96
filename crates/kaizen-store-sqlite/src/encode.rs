//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with microsecond
//! precision. Priorities are stored as their tier number, statuses as their
//! snake_case name.

use chrono::{DateTime, SecondsFormat, Utc};
use kaizen_core::{
  event::{CommentEvent, RawEvent, ResolutionEvent},
  model::{
    ActorProfile, Comment, Department, Employee, IssueStatus, Issue, Priority,
  },
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Priority / status ───────────────────────────────────────────────────────

pub fn encode_priority(p: Priority) -> i64 { i64::from(p.tier()) }

pub fn decode_priority(tier: i64) -> Result<Priority> { Ok(Priority::from_tier(tier)?) }

pub fn encode_status(s: IssueStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<IssueStatus> { Ok(IssueStatus::parse(s)?) }

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Raw `departments` row.
pub struct RawDepartment {
  pub id:       i64,
  pub name:     String,
  pub label:    String,
  pub label_th: Option<String>,
}

impl RawDepartment {
  pub fn into_department(self) -> Department {
    Department {
      id:       self.id,
      name:     self.name,
      label:    self.label,
      label_th: self.label_th,
    }
  }
}

/// Raw `employees` row.
pub struct RawEmployee {
  pub id:             i64,
  pub name:           String,
  pub name_secondary: Option<String>,
  pub department_id:  Option<i64>,
}

impl RawEmployee {
  pub fn into_employee(self) -> Employee {
    Employee {
      id:             self.id,
      name:           self.name,
      name_secondary: self.name_secondary,
      department_id:  self.department_id,
    }
  }
}

/// An `employees` row left-joined with its department.
pub struct RawProfile {
  pub employee:   RawEmployee,
  pub department: Option<RawDepartment>,
}

impl RawProfile {
  pub fn into_profile(self) -> ActorProfile {
    ActorProfile {
      employee:   self.employee.into_employee(),
      department: self.department.map(RawDepartment::into_department),
    }
  }
}

/// Raw `issues` row.
pub struct RawIssue {
  pub id:          i64,
  pub title:       String,
  pub description: Option<String>,
  pub priority:    i64,
  pub status:      String,
  pub reporter_id: Option<i64>,
  pub solver_id:   Option<i64>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawIssue {
  pub fn into_issue(self) -> Result<Issue> {
    Ok(Issue {
      id:          self.id,
      title:       self.title,
      description: self.description,
      priority:    decode_priority(self.priority)?,
      status:      decode_status(&self.status)?,
      reporter_id: self.reporter_id,
      solver_id:   self.solver_id,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw `comments` row.
pub struct RawComment {
  pub id:         i64,
  pub issue_id:   i64,
  pub author_id:  i64,
  pub body:       String,
  pub created_at: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:         self.id,
      issue_id:   self.issue_id,
      author_id:  self.author_id,
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// One resolved issue, as seen by the resolver leaderboard.
pub struct RawResolution {
  pub actor_id:   i64,
  pub priority:   i64,
  pub status:     String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawResolution {
  pub fn into_event(self) -> Result<RawEvent> {
    Ok(RawEvent::Resolver(ResolutionEvent {
      actor_id:   self.actor_id,
      priority:   decode_priority(self.priority)?,
      status:     decode_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    }))
  }
}

/// One comment joined with its issue's tiers.
pub struct RawCommentEvent {
  pub actor_id:   i64,
  pub priority:   i64,
  pub status:     String,
  pub created_at: String,
}

impl RawCommentEvent {
  pub fn into_event(self) -> Result<RawEvent> {
    Ok(RawEvent::Commenter(CommentEvent {
      actor_id:   self.actor_id,
      priority:   decode_priority(self.priority)?,
      status:     decode_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
    }))
  }
}
