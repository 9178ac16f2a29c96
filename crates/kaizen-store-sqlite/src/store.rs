//! [`SqliteStore`] — the SQLite implementation of [`RankingStore`] and
//! [`IssueStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use kaizen_core::{
  aggregate::ActorCount,
  event::{DateRange, EventKind, RawEvent},
  model::{
    ActorProfile, Comment, Department, DepartmentId, Employee, EmployeeId, Issue,
    IssueId, IssueStatus, NewComment, NewDepartment, NewEmployee, NewIssue,
    StatusChange,
  },
  store::{IssueStore, RankingStore},
};

use crate::{
  Result,
  encode::{
    RawComment, RawCommentEvent, RawDepartment, RawEmployee, RawIssue, RawProfile,
    RawResolution, decode_dt, encode_dt, encode_priority, encode_status,
  },
  schema::SCHEMA,
};

const ISSUE_COLUMNS: &str = "id, title, description, priority, status, reporter_id, solver_id, created_at, updated_at";

/// Statuses that count as resolved, as an SQL list.
const RESOLVED_SQL: &str = "('done', 'verified', 'closed')";

fn issue_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawIssue> {
  Ok(RawIssue {
    id:          row.get(0)?,
    title:       row.get(1)?,
    description: row.get(2)?,
    priority:    row.get(3)?,
    status:      row.get(4)?,
    reporter_id: row.get(5)?,
    solver_id:   row.get(6)?,
    created_at:  row.get(7)?,
    updated_at:  row.get(8)?,
  })
}

/// Encode an optional window as a pair of nullable bounds.
fn encode_range(range: Option<DateRange>) -> (Option<String>, Option<String>) {
  match range {
    Some(r) => (Some(encode_dt(r.from)), Some(encode_dt(r.to))),
    None => (None, None),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An issue tracker store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RankingStore impl ───────────────────────────────────────────────────────

impl RankingStore for SqliteStore {
  type Error = crate::Error;

  async fn top_actors(
    &self,
    kind: EventKind,
    range: Option<DateRange>,
    limit: usize,
  ) -> Result<Vec<ActorCount>> {
    let (from, to) = encode_range(range);
    let limit_val  = i64::try_from(limit).unwrap_or(i64::MAX);

    // Ties are ordered by actor id so the cut-off is deterministic.
    let sql = match kind {
      EventKind::Resolver => format!(
        "SELECT solver_id, COUNT(*) AS n
         FROM issues
         WHERE solver_id IS NOT NULL
           AND status IN {RESOLVED_SQL}
           AND (?1 IS NULL OR created_at >= ?1)
           AND (?2 IS NULL OR created_at <= ?2)
         GROUP BY solver_id
         ORDER BY n DESC, solver_id ASC
         LIMIT ?3"
      ),
      EventKind::Commenter => "SELECT author_id, COUNT(*) AS n
         FROM comments
         WHERE (?1 IS NULL OR created_at >= ?1)
           AND (?2 IS NULL OR created_at <= ?2)
         GROUP BY author_id
         ORDER BY n DESC, author_id ASC
         LIMIT ?3"
        .to_owned(),
    };

    let rows: Vec<(i64, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![from, to, limit_val], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(actor_id, n)| ActorCount {
          actor_id,
          raw_count: u64::try_from(n).unwrap_or(0),
        })
        .collect(),
    )
  }

  async fn actor_events(
    &self,
    kind: EventKind,
    actor_id: EmployeeId,
    range: Option<DateRange>,
  ) -> Result<Vec<RawEvent>> {
    let (from, to) = encode_range(range);

    match kind {
      EventKind::Resolver => {
        let raws: Vec<RawResolution> = self
          .conn
          .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
              "SELECT solver_id, priority, status, created_at, updated_at
               FROM issues
               WHERE solver_id = ?1
                 AND status IN {RESOLVED_SQL}
                 AND (?2 IS NULL OR created_at >= ?2)
                 AND (?3 IS NULL OR created_at <= ?3)
               ORDER BY id"
            ))?;
            let rows = stmt
              .query_map(rusqlite::params![actor_id, from, to], |row| {
                Ok(RawResolution {
                  actor_id:   row.get(0)?,
                  priority:   row.get(1)?,
                  status:     row.get(2)?,
                  created_at: row.get(3)?,
                  updated_at: row.get(4)?,
                })
              })?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
          })
          .await?;
        raws.into_iter().map(RawResolution::into_event).collect()
      }
      EventKind::Commenter => {
        let raws: Vec<RawCommentEvent> = self
          .conn
          .call(move |conn| {
            let mut stmt = conn.prepare(
              "SELECT c.author_id, i.priority, i.status, c.created_at
               FROM comments c
               JOIN issues i ON i.id = c.issue_id
               WHERE c.author_id = ?1
                 AND (?2 IS NULL OR c.created_at >= ?2)
                 AND (?3 IS NULL OR c.created_at <= ?3)
               ORDER BY c.id",
            )?;
            let rows = stmt
              .query_map(rusqlite::params![actor_id, from, to], |row| {
                Ok(RawCommentEvent {
                  actor_id:   row.get(0)?,
                  priority:   row.get(1)?,
                  status:     row.get(2)?,
                  created_at: row.get(3)?,
                })
              })?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
          })
          .await?;
        raws.into_iter().map(RawCommentEvent::into_event).collect()
      }
    }
  }

  async fn actor_profiles<'a>(&'a self, ids: &'a [EmployeeId]) -> Result<Vec<ActorProfile>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids = ids.to_vec();

    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
          "SELECT e.id, e.name, e.name_secondary, e.department_id,
                  d.id, d.name, d.label, d.label_th
           FROM employees e
           LEFT JOIN departments d ON d.id = e.department_id
           WHERE e.id IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            let department_id: Option<i64> = row.get(4)?;
            let department = match department_id {
              Some(id) => Some(RawDepartment {
                id,
                name:     row.get(5)?,
                label:    row.get(6)?,
                label_th: row.get(7)?,
              }),
              None => None,
            };
            Ok(RawProfile {
              employee: RawEmployee {
                id:             row.get(0)?,
                name:           row.get(1)?,
                name_secondary: row.get(2)?,
                department_id:  row.get(3)?,
              },
              department,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawProfile::into_profile).collect())
  }
}

// ─── IssueStore impl ─────────────────────────────────────────────────────────

impl IssueStore for SqliteStore {
  type Error = crate::Error;

  // ── Directory ─────────────────────────────────────────────────────────────

  async fn add_department(&self, input: NewDepartment) -> Result<Department> {
    let NewDepartment { name, label, label_th } = input;
    let (n, l, t) = (name.clone(), label.clone(), label_th.clone());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO departments (name, label, label_th) VALUES (?1, ?2, ?3)",
          rusqlite::params![n, l, t],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Department { id, name, label, label_th })
  }

  async fn list_departments(&self) -> Result<Vec<Department>> {
    let raws: Vec<RawDepartment> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name, label, label_th FROM departments ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawDepartment {
              id:       row.get(0)?,
              name:     row.get(1)?,
              label:    row.get(2)?,
              label_th: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawDepartment::into_department).collect())
  }

  async fn get_department(&self, id: DepartmentId) -> Result<Option<Department>> {
    let raw: Option<RawDepartment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, label, label_th FROM departments WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawDepartment {
                  id:       row.get(0)?,
                  name:     row.get(1)?,
                  label:    row.get(2)?,
                  label_th: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawDepartment::into_department))
  }

  async fn add_employee(&self, input: NewEmployee) -> Result<Employee> {
    let NewEmployee { name, name_secondary, department_id } = input;
    let (n, s) = (name.clone(), name_secondary.clone());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO employees (name, name_secondary, department_id) VALUES (?1, ?2, ?3)",
          rusqlite::params![n, s, department_id],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Employee { id, name, name_secondary, department_id })
  }

  async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, name_secondary, department_id FROM employees WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawEmployee {
                  id:             row.get(0)?,
                  name:           row.get(1)?,
                  name_secondary: row.get(2)?,
                  department_id:  row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawEmployee::into_employee))
  }

  // ── Issues ────────────────────────────────────────────────────────────────

  async fn report_issue(&self, input: NewIssue) -> Result<Issue> {
    let at_str   = encode_dt(input.reported_at.unwrap_or_else(Utc::now));
    let priority = encode_priority(input.priority);
    let status   = encode_status(IssueStatus::Open);
    let (title, description, reporter_id) =
      (input.title.clone(), input.description.clone(), input.reporter_id);
    let stored_at = at_str.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO issues (
             title, description, priority, status, reporter_id, solver_id,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)",
          rusqlite::params![title, description, priority, status, reporter_id, stored_at],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    // Decode the stored form so callers see the same precision a read would.
    let at = decode_dt(&at_str)?;
    Ok(Issue {
      id,
      title: input.title,
      description: input.description,
      priority: input.priority,
      status: IssueStatus::Open,
      reporter_id: input.reporter_id,
      solver_id: None,
      created_at: at,
      updated_at: at,
    })
  }

  async fn get_issue(&self, id: IssueId) -> Result<Option<Issue>> {
    let raw: Option<RawIssue> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1"),
              rusqlite::params![id],
              issue_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIssue::into_issue).transpose()
  }

  async fn change_status(&self, id: IssueId, change: StatusChange) -> Result<Option<Issue>> {
    let at_str    = encode_dt(change.at.unwrap_or_else(Utc::now));
    let status    = encode_status(change.status);
    let solver_id = change.solver_id;

    let updated = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE issues
           SET status = ?1, solver_id = COALESCE(?2, solver_id), updated_at = ?3
           WHERE id = ?4",
          rusqlite::params![status, solver_id, at_str, id],
        )?;
        Ok(n)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_issue(id).await
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, input: NewComment) -> Result<Comment> {
    let at_str = encode_dt(input.at.unwrap_or_else(Utc::now));
    let NewComment { issue_id, author_id, body, .. } = input;

    let raw: RawComment = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (issue_id, author_id, body, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![issue_id, author_id, body, at_str],
        )?;
        let id = conn.last_insert_rowid();
        Ok(RawComment { id, issue_id, author_id, body, created_at: at_str })
      })
      .await?;

    raw.into_comment()
  }
}
