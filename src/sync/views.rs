//! Read-side queries over the session's collections.

use chrono::NaiveDate;

use super::SyncSession;
use crate::models::{LeaveRequest, TeamMember};

/// How many upcoming requests the overview shows by default.
pub const UPCOMING_LIMIT: usize = 5;

impl SyncSession {
    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Requests starting on or after `today`, soonest first.
    pub fn upcoming_leaves(&self, today: NaiveDate, limit: usize) -> Vec<LeaveRequest> {
        let mut upcoming: Vec<LeaveRequest> = self
            .leave_requests
            .iter()
            .filter(|l| l.start_date >= today)
            .cloned()
            .collect();
        upcoming.sort_by_key(|l| l.start_date);
        upcoming.truncate(limit);
        upcoming
    }

    pub fn leaves_for_member(&self, member_id: &str) -> Vec<LeaveRequest> {
        self.leave_requests
            .iter()
            .filter(|l| l.employee_id == member_id)
            .cloned()
            .collect()
    }

    /// Requests whose date range includes `date`.
    pub fn leaves_on(&self, date: NaiveDate) -> Vec<LeaveRequest> {
        self.leave_requests
            .iter()
            .filter(|l| l.covers(date))
            .cloned()
            .collect()
    }

    pub fn members_in_department(&self, department: &str) -> Vec<TeamMember> {
        self.members
            .iter()
            .filter(|m| m.department == department)
            .cloned()
            .collect()
    }
}
