//! Remote persistence adapter.
//!
//! The session talks to the remote relational backend only through
//! [`RemoteStore`]. Every call is a single-row (or single-statement) write or
//! read; there is no cross-table transaction, so cascades are sequences of
//! independently failing calls driven by the session.

mod rows;
mod schema;
mod sql;

pub use schema::provision;
pub use sql::SqlRemote;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::RemoteCredentials;
use crate::models::{Department, DepartmentUpdate, LeaveRequest, LeaveUpdate, MemberUpdate, TeamMember};

pub const DEPARTMENTS_TABLE: &str = "departments";
pub const TEAM_MEMBERS_TABLE: &str = "team_members";
pub const LEAVE_REQUESTS_TABLE: &str = "leave_requests";

/// Tables that must exist before the remote backend can be used.
pub const REQUIRED_TABLES: [&str; 3] = [DEPARTMENTS_TABLE, TEAM_MEMBERS_TABLE, LEAVE_REQUESTS_TABLE];

/// Failure reported by the remote backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The backend could not be reached
    Connection(String),
    /// The backend rejected the statement
    Database {
        code: Option<String>,
        message: String,
    },
    /// No row matched the key
    NotFound(String),
    /// A returned row could not be translated
    Decode(String),
    /// Any other driver failure
    Query(String),
}

impl RemoteError {
    /// Database error code, when the backend supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            RemoteError::Database { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Connection(msg) => write!(f, "connection failed: {}", msg),
            RemoteError::Database {
                code: Some(code),
                message,
            } => write!(f, "{} ({})", message, code),
            RemoteError::Database { code: None, message } => write!(f, "{}", message),
            RemoteError::NotFound(what) => write!(f, "{} not found", what),
            RemoteError::Decode(msg) => write!(f, "unreadable row: {}", msg),
            RemoteError::Query(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<sqlx::Error> for RemoteError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => RemoteError::Database {
                code: db.code().map(|c| c.into_owned()),
                message: db.message().to_string(),
            },
            sqlx::Error::RowNotFound => RemoteError::NotFound("row".to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                RemoteError::Decode(format!("column {}: {}", index, source))
            }
            e @ (sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed) => RemoteError::Connection(e.to_string()),
            e => RemoteError::Query(e.to_string()),
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// CRUD and schema probing against the three remote tables.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    // ---- probing ----

    /// Cheapest possible round trip.
    async fn ping(&self) -> RemoteResult<()>;

    /// Names from `tables` found in the system catalog.
    async fn catalog_tables(&self, tables: &[&str]) -> RemoteResult<Vec<String>>;

    /// Ask the server-side `check_table_exists` function about one table.
    async fn check_table_exists(&self, table: &str) -> RemoteResult<bool>;

    /// Zero-row query directly against `table`.
    async fn probe_table(&self, table: &str) -> RemoteResult<()>;

    // ---- read-all ----

    async fn list_departments(&self) -> RemoteResult<Vec<Department>>;
    async fn list_members(&self) -> RemoteResult<Vec<TeamMember>>;
    async fn list_leave_requests(&self) -> RemoteResult<Vec<LeaveRequest>>;

    // ---- departments ----

    async fn insert_department(&self, department: &Department) -> RemoteResult<Department>;
    async fn update_department(&self, id: &str, update: &DepartmentUpdate) -> RemoteResult<Department>;
    async fn delete_department(&self, id: &str) -> RemoteResult<()>;

    // ---- team members ----

    async fn insert_member(&self, member: &TeamMember) -> RemoteResult<TeamMember>;
    async fn update_member(&self, id: &str, update: &MemberUpdate) -> RemoteResult<TeamMember>;
    async fn delete_member(&self, id: &str) -> RemoteResult<()>;

    /// Move every member of department `old` to `new`; returns the affected member ids.
    async fn rename_members_department(&self, old: &str, new: &str) -> RemoteResult<Vec<String>>;

    /// Set the department of exactly the given members.
    async fn reassign_members(&self, member_ids: &[String], department: &str) -> RemoteResult<u64>;

    // ---- leave requests ----

    async fn insert_leave_request(&self, leave: &LeaveRequest) -> RemoteResult<LeaveRequest>;
    async fn update_leave_request(&self, id: &str, update: &LeaveUpdate) -> RemoteResult<LeaveRequest>;
    async fn delete_leave_request(&self, id: &str) -> RemoteResult<()>;

    /// Rewrite the employee name snapshot on all of one member's requests.
    async fn rename_leave_employee(&self, employee_id: &str, name: &str) -> RemoteResult<u64>;

    /// Delete all of one member's requests.
    async fn delete_leave_requests_for(&self, employee_id: &str) -> RemoteResult<u64>;
}

/// The session's handle on the remote backend.
#[derive(Clone)]
pub enum RemoteHandle {
    /// No URL or key configured
    Unconfigured,
    /// Credentials were given but no client could be built from them
    Unavailable(String),
    Configured(Arc<dyn RemoteStore>),
}

impl RemoteHandle {
    /// Build the handle from optional credentials without touching the network.
    pub fn from_credentials(credentials: Option<RemoteCredentials>) -> Self {
        let Some(credentials) = credentials else {
            return RemoteHandle::Unconfigured;
        };

        match SqlRemote::connect_lazy(&credentials) {
            Ok(remote) => RemoteHandle::Configured(Arc::new(remote)),
            Err(e) => {
                tracing::error!("Failed to create remote client: {}", e);
                RemoteHandle::Unavailable(e.to_string())
            }
        }
    }

    pub fn store(&self) -> Option<Arc<dyn RemoteStore>> {
        match self {
            RemoteHandle::Configured(store) => Some(store.clone()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for RemoteHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteHandle::Unconfigured => write!(f, "Unconfigured"),
            RemoteHandle::Unavailable(reason) => write!(f, "Unavailable({})", reason),
            RemoteHandle::Configured(_) => write!(f, "Configured"),
        }
    }
}
