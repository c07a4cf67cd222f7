//! REST API module.
//!
//! Every handler takes the session lock for the whole operation and answers
//! with the storage mode and the notifications the operation produced.

mod departments;
mod leaves;
mod members;
mod session;

pub use departments::*;
pub use leaves::*;
pub use members::*;
pub use session::*;

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{AppError, AppErrorWithSession};
use crate::models::{Notification, StorageMode};
use crate::sync::SyncSession;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub storage_mode: StorageMode,
    pub notifications: Vec<Notification>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, storage_mode: StorageMode, notifications: Vec<Notification>) -> Self {
        Self {
            success: true,
            data,
            storage_mode,
            notifications,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithSession>;

/// Wrap an operation result in the envelope, draining the session's notifications.
pub fn respond<T: Serialize>(session: &mut SyncSession, result: Result<T, AppError>) -> ApiResult<T> {
    let storage_mode = session.mode();
    let notifications = session.take_notifications();

    match result {
        Ok(data) => Ok(ApiResponse::new(data, storage_mode, notifications)),
        Err(error) => Err(AppErrorWithSession {
            error,
            storage_mode,
            notifications,
        }),
    }
}

/// JSON body extractor whose rejection is answered in the error envelope.
pub struct ApiJson<T>(pub T);

impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorWithSession;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                tracing::warn!("Rejected request body: {}", message);
                let session = state.session.lock().await;
                Err(AppErrorWithSession {
                    error: AppError::BadRequest(message.clone()),
                    storage_mode: session.mode(),
                    notifications: vec![Notification::error("Error", message)],
                })
            }
        }
    }
}
