//! Canonical default records used to seed an empty store.

use chrono::NaiveDate;

use crate::models::{Department, LeaveRequest, LeaveType, TeamMember};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn default_departments() -> Vec<Department> {
    let department = |id: &str, name: &str, description: &str| Department {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        created_date: date(2024, 1, 1),
    };

    vec![
        department(
            "1",
            "Engineering",
            "Responsible for software development, system architecture, and technical infrastructure. Handles product development and maintains our technology stack.",
        ),
        department(
            "2",
            "Design",
            "Creates user experiences, visual designs, and brand materials. Focuses on user research, prototyping, and design systems.",
        ),
        department(
            "3",
            "Marketing",
            "Drives brand awareness, lead generation, and customer acquisition. Manages campaigns, content creation, and market research.",
        ),
        department(
            "4",
            "HR",
            "Manages talent acquisition, employee relations, and organizational development. Handles benefits, policies, and workplace culture.",
        ),
        department(
            "5",
            "Sales",
            "Responsible for revenue generation, client relationships, and business development. Manages the sales pipeline and customer success.",
        ),
    ]
}

pub fn default_members() -> Vec<TeamMember> {
    let member = |id: &str, name: &str, email: &str, department: &str| TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        department: department.to_string(),
        avatar: None,
    };

    vec![
        member("1", "Alice Johnson", "alice@company.com", "Engineering"),
        member("2", "Bob Smith", "bob@company.com", "Design"),
        member("3", "Carol Davis", "carol@company.com", "Marketing"),
        member("4", "David Wilson", "david@company.com", "Engineering"),
        member("5", "Eva Brown", "eva@company.com", "HR"),
    ]
}

pub fn default_leave_requests() -> Vec<LeaveRequest> {
    vec![
        LeaveRequest {
            id: "1".to_string(),
            employee_name: "Alice Johnson".to_string(),
            employee_id: "1".to_string(),
            start_date: date(2024, 12, 23),
            end_date: date(2024, 12, 27),
            leave_type: LeaveType::Vacation,
            reason: "Christmas holidays".to_string(),
            submitted_date: date(2024, 12, 1),
        },
        LeaveRequest {
            id: "2".to_string(),
            employee_name: "Bob Smith".to_string(),
            employee_id: "2".to_string(),
            start_date: date(2024, 12, 30),
            end_date: date(2025, 1, 2),
            leave_type: LeaveType::Vacation,
            reason: "New Year break".to_string(),
            submitted_date: date(2024, 12, 5),
        },
        LeaveRequest {
            id: "3".to_string(),
            employee_name: "Carol Davis".to_string(),
            employee_id: "3".to_string(),
            start_date: date(2025, 1, 15),
            end_date: date(2025, 1, 17),
            leave_type: LeaveType::Personal,
            reason: "Family event".to_string(),
            submitted_date: date(2024, 12, 20),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_references_are_consistent() {
        let departments = default_departments();
        let members = default_members();

        for member in &members {
            assert!(departments.iter().any(|d| d.name == member.department));
        }
        for leave in default_leave_requests() {
            let member = members.iter().find(|m| m.id == leave.employee_id).unwrap();
            assert_eq!(member.name, leave.employee_name);
            assert!(leave.start_date <= leave.end_date);
        }
    }
}
