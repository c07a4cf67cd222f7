//! Session snapshot returned to the frontend.

use serde::{Deserialize, Serialize};

use super::{Department, LeaveRequest, TeamMember};

/// Which backend the current session persists to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StorageMode {
    Checking,
    Local,
    Remote,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Checking => "checking",
            StorageMode::Local => "local",
            StorageMode::Remote => "remote",
        }
    }
}

/// All three collections as currently held by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub storage_mode: StorageMode,
    pub departments: Vec<Department>,
    pub members: Vec<TeamMember>,
    pub leave_requests: Vec<LeaveRequest>,
}

/// Storage mode and diagnostic banner for the header of the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub storage_mode: StorageMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub member_count: usize,
    pub department_count: usize,
    pub leave_request_count: usize,
}
