//! Member API endpoints.

use axum::extract::{Path, State};

use super::{respond, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{LeaveRequest, MemberUpdate, NewMember, TeamMember};
use crate::AppState;

/// GET /api/members - List all members.
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    let mut session = state.session.lock().await;
    let members = session.members().to_vec();
    respond(&mut session, Ok(members))
}

/// GET /api/members/:id - Get a single member.
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TeamMember> {
    let mut session = state.session.lock().await;
    let result = session
        .member(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)));
    respond(&mut session, result)
}

/// POST /api/members - Add a team member.
pub async fn create_member(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewMember>,
) -> ApiResult<TeamMember> {
    let mut session = state.session.lock().await;
    let result = session.add_member(request).await;
    respond(&mut session, result)
}

/// PUT /api/members/:id - Update a member (renames cascade to their leave).
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<MemberUpdate>,
) -> ApiResult<TeamMember> {
    let mut session = state.session.lock().await;
    let result = session.edit_member(&id, request).await;
    respond(&mut session, result)
}

/// DELETE /api/members/:id - Delete a member and their leave requests.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TeamMember> {
    let mut session = state.session.lock().await;
    let result = session.delete_member(&id).await;
    respond(&mut session, result)
}

/// GET /api/members/:id/leaves - Leave requests of one member.
pub async fn list_member_leaves(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<LeaveRequest>> {
    let mut session = state.session.lock().await;
    let result = match session.member(&id) {
        Some(_) => Ok(session.leaves_for_member(&id)),
        None => Err(AppError::NotFound(format!("Member {} not found", id))),
    };
    respond(&mut session, result)
}
