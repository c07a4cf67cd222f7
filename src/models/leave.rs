//! Leave request model matching the frontend LeaveRequest interface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The closed set of leave categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    Maternity,
    Paternity,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "vacation",
            LeaveType::Sick => "sick",
            LeaveType::Personal => "personal",
            LeaveType::Maternity => "maternity",
            LeaveType::Paternity => "paternity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "vacation" => Some(LeaveType::Vacation),
            "sick" => Some(LeaveType::Sick),
            "personal" => Some(LeaveType::Personal),
            "maternity" => Some(LeaveType::Maternity),
            "paternity" => Some(LeaveType::Paternity),
            _ => None,
        }
    }
}

/// A request for time off covering an inclusive range of calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: String,
    /// Snapshot of the member's name, kept in sync on rename.
    pub employee_name: String,
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
    pub submitted_date: NaiveDate,
}

impl LeaveRequest {
    /// Whether `date` falls within the inclusive range of this request.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Request body for submitting leave. The employee name is looked up, not trusted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
}

/// Request body for editing leave. Employee and submission date are fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveUpdate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_leave_type_strings() {
        for leave_type in [
            LeaveType::Vacation,
            LeaveType::Sick,
            LeaveType::Personal,
            LeaveType::Maternity,
            LeaveType::Paternity,
        ] {
            assert_eq!(LeaveType::from_str(leave_type.as_str()), Some(leave_type));
        }
        assert_eq!(LeaveType::from_str("sabbatical"), None);
    }

    #[test]
    fn test_leave_request_json_shape() {
        let json = serde_json::json!({
            "id": "1",
            "employeeName": "Alice Johnson",
            "employeeId": "1",
            "startDate": "2024-12-23",
            "endDate": "2024-12-27",
            "leaveType": "vacation",
            "reason": "Christmas holidays",
            "submittedDate": "2024-12-01"
        });

        let leave: LeaveRequest = serde_json::from_value(json).unwrap();
        assert_eq!(leave.leave_type, LeaveType::Vacation);
        assert_eq!(leave.start_date, date("2024-12-23"));
    }

    #[test]
    fn test_covers_is_inclusive() {
        let leave = LeaveRequest {
            id: "1".to_string(),
            employee_name: "Alice".to_string(),
            employee_id: "1".to_string(),
            start_date: date("2025-01-15"),
            end_date: date("2025-01-17"),
            leave_type: LeaveType::Personal,
            reason: "Family event".to_string(),
            submitted_date: date("2024-12-20"),
        };

        assert!(leave.covers(date("2025-01-15")));
        assert!(leave.covers(date("2025-01-17")));
        assert!(!leave.covers(date("2025-01-18")));
        assert!(!leave.covers(date("2025-01-14")));
    }
}
