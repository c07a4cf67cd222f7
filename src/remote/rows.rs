//! Translation between snake_case remote rows and camelCase domain models.

use chrono::NaiveDate;
use sqlx::any::AnyRow;
use sqlx::Row;

use super::{RemoteError, RemoteResult};
use crate::models::{Department, LeaveRequest, LeaveType, TeamMember};

pub const DEPARTMENT_COLUMNS: &str = "id, name, description, created_date";
pub const MEMBER_COLUMNS: &str = "id, name, email, department, avatar_url";
pub const LEAVE_COLUMNS: &str =
    "id, employee_name, employee_id, start_date, end_date, leave_type, reason, submitted_date";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(row: &AnyRow, column: &str) -> RemoteResult<NaiveDate> {
    let raw: String = row.try_get(column)?;
    // Accept timestamps by keeping only the date part.
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|e| RemoteError::Decode(format!("{} = {:?}: {}", column, raw, e)))
}

pub fn department_from_row(row: &AnyRow) -> RemoteResult<Department> {
    Ok(Department {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_date: parse_date(row, "created_date")?,
    })
}

pub fn member_from_row(row: &AnyRow) -> RemoteResult<TeamMember> {
    Ok(TeamMember {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        department: row.try_get("department")?,
        avatar: row.try_get("avatar_url")?,
    })
}

pub fn leave_from_row(row: &AnyRow) -> RemoteResult<LeaveRequest> {
    let raw_type: String = row.try_get("leave_type")?;
    let leave_type = LeaveType::from_str(&raw_type)
        .ok_or_else(|| RemoteError::Decode(format!("unknown leave_type {:?}", raw_type)))?;

    Ok(LeaveRequest {
        id: row.try_get("id")?,
        employee_name: row.try_get("employee_name")?,
        employee_id: row.try_get("employee_id")?,
        start_date: parse_date(row, "start_date")?,
        end_date: parse_date(row, "end_date")?,
        leave_type,
        reason: row.try_get("reason")?,
        submitted_date: parse_date(row, "submitted_date")?,
    })
}

pub fn collect<T>(
    rows: Vec<AnyRow>,
    translate: fn(&AnyRow) -> RemoteResult<T>,
) -> RemoteResult<Vec<T>> {
    rows.iter().map(translate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(format_date(date), "2025-01-02");
    }
}
