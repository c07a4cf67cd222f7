//! Department API endpoints.

use axum::extract::{Path, State};

use super::{respond, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{Department, DepartmentUpdate, NewDepartment, TeamMember};
use crate::AppState;

/// GET /api/departments - List all departments.
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let mut session = state.session.lock().await;
    let departments = session.departments().to_vec();
    respond(&mut session, Ok(departments))
}

/// POST /api/departments - Add a department.
pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewDepartment>,
) -> ApiResult<Department> {
    let mut session = state.session.lock().await;
    let result = session.add_department(request).await;
    respond(&mut session, result)
}

/// PUT /api/departments/:id - Rename or re-describe a department.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<DepartmentUpdate>,
) -> ApiResult<Department> {
    let mut session = state.session.lock().await;
    let result = session.edit_department(&id, request).await;
    respond(&mut session, result)
}

/// DELETE /api/departments/:id - Delete an empty department.
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Department> {
    let mut session = state.session.lock().await;
    let result = session.delete_department(&id).await;
    respond(&mut session, result)
}

/// GET /api/departments/:id/members - Members assigned to a department.
pub async fn list_department_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<TeamMember>> {
    let mut session = state.session.lock().await;
    let result = match session.departments().iter().find(|d| d.id == id) {
        Some(department) => Ok(session.members_in_department(&department.name)),
        None => Err(AppError::NotFound(format!("Department {} not found", id))),
    };
    respond(&mut session, result)
}
