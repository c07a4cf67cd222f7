//! Synchronization mediator.
//!
//! A [`SyncSession`] owns the three collections for the lifetime of a session.
//! On start it asks the [`Prober`] which backend to use, loads everything from
//! that backend, and from then on routes every mutation to it. Load failures
//! demote the session to local storage; mutation failures are reported and
//! leave the in-memory state untouched.
//!
//! ```text
//! Checking ──probe──▶ Remote ──(any of the three reads fails)──▶ Local
//!     └──────────────▶ Local
//! ```

mod departments;
mod leaves;
mod members;
mod views;

pub use views::UPCOMING_LIMIT;

use chrono::NaiveDate;
use std::sync::Arc;

use crate::errors::AppError;
use crate::local::{Collection, LocalStore};
use crate::models::{
    Department, LeaveRequest, Notification, SessionInfo, Snapshot, StorageMode, TeamMember,
};
use crate::probe::{BackendDecision, Prober};
use crate::remote::{
    RemoteError, RemoteHandle, RemoteResult, RemoteStore, DEPARTMENTS_TABLE,
    LEAVE_REQUESTS_TABLE, TEAM_MEMBERS_TABLE,
};

/// Banner shown when the remote tables are missing.
pub const TABLES_NOT_FOUND: &str =
    "Database tables not found. Run `leave-sync provision` against the remote database.";

/// Reported when a cascade failed and could not be rolled back.
const REMOTE_INCONSISTENT: &str =
    "The change failed part-way and could not be undone. Remote data may be inconsistent.";

pub struct SyncSession {
    mode: StorageMode,
    diagnostic: Option<String>,
    remote: RemoteHandle,
    local: LocalStore,
    departments: Vec<Department>,
    members: Vec<TeamMember>,
    leave_requests: Vec<LeaveRequest>,
    notifications: Vec<Notification>,
}

impl SyncSession {
    pub fn new(remote: RemoteHandle, local: LocalStore) -> Self {
        Self {
            mode: StorageMode::Checking,
            diagnostic: None,
            remote,
            local,
            departments: Vec::new(),
            members: Vec::new(),
            leave_requests: Vec::new(),
            notifications: Vec::new(),
        }
    }

    /// Probe, pick a backend and load all three collections from it.
    ///
    /// Calling this again is the manual "retry connection" action.
    pub async fn start(&mut self, prober: &Prober) {
        tracing::info!("Initializing team leave session...");
        self.mode = StorageMode::Checking;
        self.diagnostic = None;

        match prober.probe(&self.remote).await {
            BackendDecision::Ready => self.load_remote().await,
            BackendDecision::Unconfigured => self.load_local(None).await,
            BackendDecision::NotProvisioned => {
                self.load_local(Some(TABLES_NOT_FOUND.to_string())).await
            }
            BackendDecision::Error(message) => {
                let banner = format!(
                    "Database connection failed: {}. Using local storage mode.",
                    message
                );
                self.load_local(Some(banner)).await
            }
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn leave_requests(&self) -> &[LeaveRequest] {
        &self.leave_requests
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            storage_mode: self.mode,
            departments: self.departments.clone(),
            members: self.members.clone(),
            leave_requests: self.leave_requests.clone(),
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            storage_mode: self.mode,
            diagnostic: self.diagnostic.clone(),
            member_count: self.members.len(),
            department_count: self.departments.len(),
            leave_request_count: self.leave_requests.len(),
        }
    }

    /// Hand over the notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    async fn load_local(&mut self, diagnostic: Option<String>) {
        tracing::info!("Loading data from local storage");
        self.local.initialize_defaults().await;

        self.departments = self.local.load_departments().await;
        self.members = self.local.load_members().await;
        self.leave_requests = self.local.load_leave_requests().await;
        self.mode = StorageMode::Local;
        self.diagnostic = diagnostic;

        tracing::info!(
            members = self.members.len(),
            leave_requests = self.leave_requests.len(),
            departments = self.departments.len(),
            "Local data loaded"
        );
    }

    async fn load_remote(&mut self) {
        let Some(store) = self.remote.store() else {
            self.load_local(None).await;
            return;
        };

        tracing::info!("Loading data from remote database...");
        let (departments, members, leave_requests) = tokio::join!(
            store.list_departments(),
            store.list_members(),
            store.list_leave_requests()
        );

        match all_loaded(departments, members, leave_requests) {
            Ok((departments, members, leave_requests)) => {
                self.departments = departments;
                self.members = members;
                self.leave_requests = leave_requests;
                self.mode = StorageMode::Remote;
                self.diagnostic = None;
                tracing::info!(
                    members = self.members.len(),
                    leave_requests = self.leave_requests.len(),
                    departments = self.departments.len(),
                    "Remote data loaded"
                );
            }
            Err(err) => {
                tracing::error!("Error loading data from remote database: {}", err);
                let banner = format!("Database error: {}. Using local storage mode.", err.message());
                self.load_local(Some(banner)).await;
            }
        }
    }

    /// The remote store, only while the session is in remote mode.
    fn remote_store(&self) -> Option<Arc<dyn RemoteStore>> {
        match self.mode {
            StorageMode::Remote => self.remote.store(),
            _ => None,
        }
    }

    /// Write the given collections back to the local store (local mode only).
    async fn persist(&self, collections: &[Collection]) {
        if self.mode != StorageMode::Local {
            return;
        }

        for collection in collections {
            match collection {
                Collection::Members => self.local.save(*collection, &self.members).await,
                Collection::LeaveRequests => {
                    self.local.save(*collection, &self.leave_requests).await
                }
                Collection::Departments => self.local.save(*collection, &self.departments).await,
            }
        }
    }

    fn succeed(&mut self, message: &str) {
        self.notifications.push(Notification::success(message));
    }

    /// Report a rejected request and hand the error back.
    fn reject(&mut self, error: AppError) -> AppError {
        self.notifications
            .push(Notification::error("Error", error.message()));
        error
    }

    /// Report a failed remote write and hand back the matching error.
    fn mutation_failed(&mut self, message: &str, error: RemoteError) -> AppError {
        tracing::error!("{} {}", message, error);
        self.notifications.push(Notification::error("Error", message));

        match AppError::from(error) {
            AppError::Mutation(detail) => AppError::Mutation(format!("{} {}", message, detail)),
            other => other,
        }
    }
}

fn all_loaded(
    departments: RemoteResult<Vec<Department>>,
    members: RemoteResult<Vec<TeamMember>>,
    leave_requests: RemoteResult<Vec<LeaveRequest>>,
) -> Result<(Vec<Department>, Vec<TeamMember>, Vec<LeaveRequest>), AppError> {
    Ok((
        departments.map_err(partial_load(DEPARTMENTS_TABLE))?,
        members.map_err(partial_load(TEAM_MEMBERS_TABLE))?,
        leave_requests.map_err(partial_load(LEAVE_REQUESTS_TABLE))?,
    ))
}

fn partial_load(table: &'static str) -> impl Fn(RemoteError) -> AppError {
    move |e| AppError::PartialLoad {
        table: table.to_string(),
        message: e.to_string(),
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Trimmed text, or `None` when nothing is left.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
