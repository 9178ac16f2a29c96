//! Handlers for `/departments` and `/employees`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/departments` | All departments |
//! | `POST` | `/departments` | Body: [`NewDepartment`]; returns 201 |
//! | `POST` | `/employees` | Body: [`NewEmployee`]; 404 if the department is unknown |
//! | `GET`  | `/employees/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kaizen_core::{
  model::{Department, Employee, EmployeeId, NewDepartment, NewEmployee},
  store::IssueStore,
};

use crate::error::ApiError;

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::BadRequest(format!("{field} must not be blank")));
  }
  Ok(())
}

// ─── Departments ──────────────────────────────────────────────────────────────

/// `GET /departments`
pub async fn list_departments<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Department>>, ApiError>
where
  S: IssueStore,
{
  let departments = store.list_departments().await.map_err(ApiError::store)?;
  Ok(Json(departments))
}

/// `POST /departments` — body: `{"name":"Assembly","label":"조립","label_th":"ประกอบ"}`
pub async fn create_department<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDepartment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IssueStore,
{
  require_text("name", &body.name)?;
  require_text("label", &body.label)?;
  let department = store.add_department(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(department)))
}

// ─── Employees ────────────────────────────────────────────────────────────────

/// `POST /employees`
pub async fn create_employee<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewEmployee>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IssueStore,
{
  require_text("name", &body.name)?;
  if let Some(id) = body.department_id {
    store
      .get_department(id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| ApiError::NotFound(format!("department {id} not found")))?;
  }
  let employee = store.add_employee(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(employee)))
}

/// `GET /employees/:id`
pub async fn get_employee<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<EmployeeId>,
) -> Result<Json<Employee>, ApiError>
where
  S: IssueStore,
{
  let employee = find_employee(store.as_ref(), id).await?;
  Ok(Json(employee))
}

/// Look up an employee, mapping absence to 404.
pub(crate) async fn find_employee<S>(store: &S, id: EmployeeId) -> Result<Employee, ApiError>
where
  S: IssueStore,
{
  store
    .get_employee(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("employee {id} not found")))
}
