//! Leave request and calendar API endpoints.

use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{respond, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{LeaveRequest, LeaveUpdate, NewLeaveRequest};
use crate::sync::{today, UPCOMING_LIMIT};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<usize>,
}

/// GET /api/leaves - List all leave requests, newest submission first.
pub async fn list_leaves(State(state): State<AppState>) -> ApiResult<Vec<LeaveRequest>> {
    let mut session = state.session.lock().await;
    let leaves = session.leave_requests().to_vec();
    respond(&mut session, Ok(leaves))
}

/// POST /api/leaves - Submit a leave request.
pub async fn create_leave(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewLeaveRequest>,
) -> ApiResult<LeaveRequest> {
    let mut session = state.session.lock().await;
    let result = session.submit_leave(request).await;
    respond(&mut session, result)
}

/// PUT /api/leaves/:id - Change dates, type or reason.
pub async fn update_leave(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<LeaveUpdate>,
) -> ApiResult<LeaveRequest> {
    let mut session = state.session.lock().await;
    let result = session.edit_leave(&id, request).await;
    respond(&mut session, result)
}

/// DELETE /api/leaves/:id - Delete a leave request.
pub async fn delete_leave(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<LeaveRequest> {
    let mut session = state.session.lock().await;
    let result = session.delete_leave(&id).await;
    respond(&mut session, result)
}

/// GET /api/leaves/upcoming?limit=N - Requests starting today or later.
pub async fn list_upcoming_leaves(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Vec<LeaveRequest>> {
    let mut session = state.session.lock().await;
    let leaves = session.upcoming_leaves(today(), query.limit.unwrap_or(UPCOMING_LIMIT));
    respond(&mut session, Ok(leaves))
}

/// GET /api/calendar/:date - Requests covering one day (YYYY-MM-DD).
pub async fn get_calendar_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Vec<LeaveRequest>> {
    let mut session = state.session.lock().await;
    let result = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map(|day| session.leaves_on(day))
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", date)));
    respond(&mut session, result)
}
