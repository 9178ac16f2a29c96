//! Storage traits.
//!
//! The traits are implemented by storage backends (e.g. `kaizen-store-sqlite`).
//! Higher layers (`kaizen-api`, `kaizen-server`) depend on these abstractions,
//! not on any concrete backend. Leaderboards only need [`RankingStore`]; the
//! write surface that feeds them lives in [`IssueStore`].

use std::future::Future;

use crate::{
  aggregate::ActorCount,
  event::{DateRange, EventKind, RawEvent},
  model::{
    ActorProfile, Comment, Department, DepartmentId, Employee, EmployeeId, Issue,
    IssueId, NewComment, NewDepartment, NewEmployee, NewIssue, StatusChange,
  },
};

// ─── Read side ───────────────────────────────────────────────────────────────

/// Read-only queries behind the leaderboards.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RankingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Count `kind` events per actor and return the `limit` busiest actors,
  /// highest count first.
  ///
  /// Only events whose `created_at` lies inside `range` are counted when a
  /// range is given. Ties are broken by a stable, backend-defined order.
  fn top_actors(
    &self,
    kind: EventKind,
    range: Option<DateRange>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ActorCount>, Self::Error>> + Send + '_;

  /// All `kind` events attributed to `actor_id`, filtered to `range` if given.
  fn actor_events(
    &self,
    kind: EventKind,
    actor_id: EmployeeId,
    range: Option<DateRange>,
  ) -> impl Future<Output = Result<Vec<RawEvent>, Self::Error>> + Send + '_;

  /// Employees with their departments, for the ids that exist. Order is
  /// unspecified.
  fn actor_profiles<'a>(
    &'a self,
    ids: &'a [EmployeeId],
  ) -> impl Future<Output = Result<Vec<ActorProfile>, Self::Error>> + Send + 'a;
}

// ─── Write side ──────────────────────────────────────────────────────────────

/// Departments, employees, issues and comments.
pub trait IssueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Directory ─────────────────────────────────────────────────────────

  fn add_department(
    &self,
    input: NewDepartment,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  fn get_department(
    &self,
    id: DepartmentId,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + '_;

  fn add_employee(
    &self,
    input: NewEmployee,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  fn get_employee(
    &self,
    id: EmployeeId,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + '_;

  // ── Issues ────────────────────────────────────────────────────────────

  /// Persist a new issue in the `open` status.
  fn report_issue(
    &self,
    input: NewIssue,
  ) -> impl Future<Output = Result<Issue, Self::Error>> + Send + '_;

  fn get_issue(
    &self,
    id: IssueId,
  ) -> impl Future<Output = Result<Option<Issue>, Self::Error>> + Send + '_;

  /// Move an issue to a new status and stamp `updated_at`. A `solver_id` in
  /// the change replaces the current solver; `None` leaves it untouched.
  ///
  /// Returns `None` if the issue does not exist.
  fn change_status(
    &self,
    id: IssueId,
    change: StatusChange,
  ) -> impl Future<Output = Result<Option<Issue>, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;
}
