//! Session API endpoints.

use axum::extract::State;

use super::{respond, ApiResult};
use crate::models::{SessionInfo, Snapshot};
use crate::AppState;

/// GET /api/session - Storage mode, banner and collection sizes.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<SessionInfo> {
    let mut session = state.session.lock().await;
    let info = session.info();
    respond(&mut session, Ok(info))
}

/// POST /api/session/reload - Probe again and reload everything.
pub async fn reload_session(State(state): State<AppState>) -> ApiResult<SessionInfo> {
    let mut session = state.session.lock().await;
    session.start(&state.prober).await;
    let info = session.info();
    respond(&mut session, Ok(info))
}

/// GET /api/snapshot - All three collections.
pub async fn get_snapshot(State(state): State<AppState>) -> ApiResult<Snapshot> {
    let mut session = state.session.lock().await;
    let snapshot = session.snapshot();
    respond(&mut session, Ok(snapshot))
}
