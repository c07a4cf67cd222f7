//! Error handling module for the leave backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::{Notification, StorageMode};
use crate::remote::RemoteError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
    pub const MUTATION_FAILED: &str = "MUTATION_FAILED";
    pub const SCHEMA_NOT_PROVISIONED: &str = "SCHEMA_NOT_PROVISIONED";
    pub const CONNECTION_FAILURE: &str = "CONNECTION_FAILURE";
    pub const PARTIAL_LOAD_FAILURE: &str = "PARTIAL_LOAD_FAILURE";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Missing or malformed input
    Validation(String),
    /// Duplicate email/name, or a department that still has members
    Constraint {
        message: String,
        member_count: Option<usize>,
    },
    /// A single remote write was rejected
    Mutation(String),
    /// The remote tables have not been created
    SchemaNotProvisioned(String),
    /// The remote backend could not be reached
    Connection(String),
    /// One of the initial remote reads failed
    PartialLoad { table: String, message: String },
    /// Bad request
    BadRequest(String),
}

impl AppError {
    pub fn constraint(message: impl Into<String>) -> Self {
        AppError::Constraint {
            message: message.into(),
            member_count: None,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Constraint { .. } => StatusCode::CONFLICT,
            AppError::Mutation(_) => StatusCode::BAD_GATEWAY,
            AppError::SchemaNotProvisioned(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PartialLoad { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Constraint { .. } => codes::CONSTRAINT_VIOLATION,
            AppError::Mutation(_) => codes::MUTATION_FAILED,
            AppError::SchemaNotProvisioned(_) => codes::SCHEMA_NOT_PROVISIONED,
            AppError::Connection(_) => codes::CONNECTION_FAILURE,
            AppError::PartialLoad { .. } => codes::PARTIAL_LOAD_FAILURE,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Constraint { message, .. } => message.clone(),
            AppError::Mutation(msg) => msg.clone(),
            AppError::SchemaNotProvisioned(msg) => msg.clone(),
            AppError::Connection(msg) => msg.clone(),
            AppError::PartialLoad { table, message } => {
                format!("Failed to load {}: {}", table, message)
            }
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Connection(msg) => AppError::Connection(msg),
            RemoteError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            other => AppError::Mutation(other.to_string()),
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub storage_mode: StorageMode,
    pub notifications: Vec<Notification>,
}

impl ErrorResponse {
    pub fn new(error: &AppError, storage_mode: StorageMode, notifications: Vec<Notification>) -> Self {
        let details = match error {
            AppError::Constraint {
                member_count: Some(count),
                ..
            } => Some(serde_json::json!({ "memberCount": count })),
            AppError::PartialLoad { table, .. } => Some(serde_json::json!({ "table": table })),
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
            storage_mode,
            notifications,
        }
    }
}

/// Wrapper type for errors that carry session context.
pub struct AppErrorWithSession {
    pub error: AppError,
    pub storage_mode: StorageMode,
    pub notifications: Vec<Notification>,
}

impl IntoResponse for AppErrorWithSession {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.storage_mode, self.notifications);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_details_carry_member_count() {
        let error = AppError::Constraint {
            message: "Department has members".to_string(),
            member_count: Some(2),
        };

        let body = ErrorResponse::new(&error, StorageMode::Local, vec![]);
        assert_eq!(body.error.code, codes::CONSTRAINT_VIOLATION);
        assert_eq!(body.error.details.unwrap()["memberCount"], 2);
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_remote_errors_become_mutation_failures() {
        let err: AppError = RemoteError::Database {
            code: Some("23505".to_string()),
            message: "duplicate key".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), codes::MUTATION_FAILED);

        let err: AppError = RemoteError::Connection("refused".to_string()).into();
        assert_eq!(err.error_code(), codes::CONNECTION_FAILURE);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: AppError = RemoteError::NotFound("Member 7".to_string()).into();
        assert_eq!(err, AppError::NotFound("Member 7 not found".to_string()));
    }
}
