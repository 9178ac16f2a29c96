//! Handlers for `/issues` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/issues` | Body: [`NewIssue`]; returns 201 + stored issue |
//! | `GET`  | `/issues/:id` | 404 if not found |
//! | `POST` | `/issues/:id/status` | Body: [`StatusChange`] |
//! | `POST` | `/issues/:id/comments` | Body: [`CommentBody`]; returns 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use kaizen_core::{
  model::{EmployeeId, Issue, IssueId, NewComment, NewIssue, StatusChange},
  store::IssueStore,
};
use serde::Deserialize;

use crate::{
  directory::{find_employee, require_text},
  error::ApiError,
};

async fn find_issue<S>(store: &S, id: IssueId) -> Result<Issue, ApiError>
where
  S: IssueStore,
{
  store
    .get_issue(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("issue {id} not found")))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /issues`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewIssue>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IssueStore,
{
  require_text("title", &body.title)?;
  if let Some(reporter) = body.reporter_id {
    find_employee(store.as_ref(), reporter).await?;
  }
  let issue = store.report_issue(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(issue)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /issues/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<IssueId>,
) -> Result<Json<Issue>, ApiError>
where
  S: IssueStore,
{
  Ok(Json(find_issue(store.as_ref(), id).await?))
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// `POST /issues/:id/status` — body: `{"status":"done","solver_id":4}`
///
/// `solver_id` (re)assigns the solver; omit it to keep the current one.
pub async fn change_status<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<IssueId>,
  Json(change): Json<StatusChange>,
) -> Result<Json<Issue>, ApiError>
where
  S: IssueStore,
{
  if let Some(solver) = change.solver_id {
    find_employee(store.as_ref(), solver).await?;
  }
  let issue = store
    .change_status(id, change)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("issue {id} not found")))?;
  Ok(Json(issue))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub author_id: EmployeeId,
  pub body:      String,
  /// Back-fill timestamp; defaults to now.
  pub at:        Option<DateTime<Utc>>,
}

/// `POST /issues/:id/comments`
pub async fn add_comment<S>(
  State(store): State<Arc<S>>,
  Path(issue_id): Path<IssueId>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IssueStore,
{
  require_text("body", &body.body)?;
  find_issue(store.as_ref(), issue_id).await?;
  find_employee(store.as_ref(), body.author_id).await?;

  let comment = store
    .add_comment(NewComment {
      issue_id,
      author_id: body.author_id,
      body: body.body,
      at: body.at,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}
