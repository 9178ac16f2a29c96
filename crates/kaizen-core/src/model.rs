//! Persistent entities of the issue tracker: departments, employees, issues
//! and comments, plus the display language used to localise labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type DepartmentId = i64;
pub type EmployeeId = i64;
pub type IssueId = i64;
pub type CommentId = i64;

// ─── Language ────────────────────────────────────────────────────────────────

/// Display language for localised labels.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
  #[default]
  Ko,
  En,
  Th,
}

impl Lang {
  /// Parse a `lang` query value. Anything unrecognised falls back to the
  /// default language rather than being rejected.
  pub fn parse_lossy(s: Option<&str>) -> Self {
    match s.map(str::trim) {
      Some("en") => Lang::En,
      Some("th") => Lang::Th,
      _ => Lang::Ko,
    }
  }
}

// ─── Priority / status ───────────────────────────────────────────────────────

/// Issue priority. Tier 1 is the most urgent.
///
/// `Normal` is the middle ("medium") tier. `Low` is the tier whose resolver
/// weight is 1, so a slow `Low` resolution adds nothing beyond its count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Critical,
  High,
  Normal,
  Low,
}

impl Priority {
  pub const ALL: [Priority; 4] =
    [Priority::Critical, Priority::High, Priority::Normal, Priority::Low];

  pub fn tier(self) -> u8 {
    match self {
      Priority::Critical => 1,
      Priority::High => 2,
      Priority::Normal => 3,
      Priority::Low => 4,
    }
  }

  pub fn from_tier(tier: i64) -> Result<Self> {
    match tier {
      1 => Ok(Priority::Critical),
      2 => Ok(Priority::High),
      3 => Ok(Priority::Normal),
      4 => Ok(Priority::Low),
      other => Err(Error::UnknownPriorityTier(other)),
    }
  }
}

/// Workflow state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
  Open,
  InProgress,
  Done,
  Verified,
  Closed,
}

impl IssueStatus {
  /// Statuses that count an issue as resolved by its solver.
  pub const RESOLVED: [IssueStatus; 3] =
    [IssueStatus::Done, IssueStatus::Verified, IssueStatus::Closed];

  pub fn as_str(self) -> &'static str {
    match self {
      IssueStatus::Open => "open",
      IssueStatus::InProgress => "in_progress",
      IssueStatus::Done => "done",
      IssueStatus::Verified => "verified",
      IssueStatus::Closed => "closed",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "open" => Ok(IssueStatus::Open),
      "in_progress" => Ok(IssueStatus::InProgress),
      "done" => Ok(IssueStatus::Done),
      "verified" => Ok(IssueStatus::Verified),
      "closed" => Ok(IssueStatus::Closed),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }

  pub fn is_resolved(self) -> bool { Self::RESOLVED.contains(&self) }
}

// ─── Directory ───────────────────────────────────────────────────────────────

/// A factory department with labels in each supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
  pub id:       DepartmentId,
  /// English name.
  pub name:     String,
  /// Primary (Korean) label.
  pub label:    String,
  /// Thai label, if one has been entered.
  pub label_th: Option<String>,
}

impl Department {
  /// The label surfaced for `lang`.
  ///
  /// English uses `name`; Thai uses `label_th` and falls back to the primary
  /// label when it is missing or blank.
  pub fn label_for(&self, lang: Lang) -> &str {
    match lang {
      Lang::En => &self.name,
      Lang::Th => self
        .label_th
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(self.label.as_str()),
      Lang::Ko => &self.label,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartment {
  pub name:     String,
  pub label:    String,
  pub label_th: Option<String>,
}

/// An employee. Employees are the actors of every leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id:             EmployeeId,
  pub name:           String,
  /// Name in the secondary language, e.g. an English rendering.
  pub name_secondary: Option<String>,
  pub department_id:  Option<DepartmentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
  pub name:           String,
  pub name_secondary: Option<String>,
  pub department_id:  Option<DepartmentId>,
}

/// An employee joined with their department, as needed to render a
/// leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorProfile {
  pub employee:   Employee,
  pub department: Option<Department>,
}

impl ActorProfile {
  pub fn department_label(&self, lang: Lang) -> Option<&str> {
    self.department.as_ref().map(|d| d.label_for(lang))
  }
}

// ─── Issues ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
  pub id:          IssueId,
  pub title:       String,
  pub description: Option<String>,
  pub priority:    Priority,
  pub status:      IssueStatus,
  pub reporter_id: Option<EmployeeId>,
  pub solver_id:   Option<EmployeeId>,
  pub created_at:  DateTime<Utc>,
  /// Last status change; for resolved issues this is the resolution time.
  pub updated_at:  DateTime<Utc>,
}

/// Input for reporting a new issue. `reported_at` defaults to now and exists
/// so that historical issues can be back-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
  pub title:       String,
  pub description: Option<String>,
  pub priority:    Priority,
  pub reporter_id: Option<EmployeeId>,
  pub reported_at: Option<DateTime<Utc>>,
}

/// A status transition, optionally (re)assigning the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
  pub status:    IssueStatus,
  pub solver_id: Option<EmployeeId>,
  pub at:        Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:         CommentId,
  pub issue_id:   IssueId,
  pub author_id:  EmployeeId,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
  pub issue_id:  IssueId,
  pub author_id: EmployeeId,
  pub body:      String,
  pub at:        Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assembly() -> Department {
    Department {
      id:       1,
      name:     "Assembly".into(),
      label:    "조립".into(),
      label_th: Some("ประกอบ".into()),
    }
  }

  #[test]
  fn label_follows_language() {
    let d = assembly();
    assert_eq!(d.label_for(Lang::Ko), "조립");
    assert_eq!(d.label_for(Lang::En), "Assembly");
    assert_eq!(d.label_for(Lang::Th), "ประกอบ");
  }

  #[test]
  fn thai_label_falls_back_to_primary() {
    let mut d = assembly();
    d.label_th = None;
    assert_eq!(d.label_for(Lang::Th), "조립");
    d.label_th = Some("  ".into());
    assert_eq!(d.label_for(Lang::Th), "조립");
  }

  #[test]
  fn unknown_lang_is_default() {
    assert_eq!(Lang::parse_lossy(Some("fr")), Lang::Ko);
    assert_eq!(Lang::parse_lossy(None), Lang::Ko);
    assert_eq!(Lang::parse_lossy(Some("th")), Lang::Th);
    assert_eq!(Lang::parse_lossy(Some("en")), Lang::En);
  }

  #[test]
  fn priority_tiers_round_trip() {
    for p in Priority::ALL {
      assert_eq!(Priority::from_tier(p.tier() as i64).unwrap(), p);
    }
    assert!(Priority::from_tier(0).is_err());
    assert!(Priority::from_tier(5).is_err());
  }

  #[test]
  fn resolved_statuses() {
    assert!(IssueStatus::Done.is_resolved());
    assert!(IssueStatus::Verified.is_resolved());
    assert!(IssueStatus::Closed.is_resolved());
    assert!(!IssueStatus::Open.is_resolved());
    assert!(!IssueStatus::InProgress.is_resolved());
    assert_eq!(IssueStatus::parse("in_progress").unwrap(), IssueStatus::InProgress);
    assert!(IssueStatus::parse("pending").is_err());
  }
}
