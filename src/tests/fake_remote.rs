//! In-memory [`RemoteStore`] with failure injection.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{
    Department, DepartmentUpdate, LeaveRequest, LeaveType, LeaveUpdate, MemberUpdate, TeamMember,
};
use crate::remote::{RemoteError, RemoteResult, RemoteStore, REQUIRED_TABLES};

#[derive(Default)]
struct Tables {
    departments: Vec<Department>,
    members: Vec<TeamMember>,
    leave_requests: Vec<LeaveRequest>,
}

pub struct FakeRemote {
    provisioned: bool,
    tables: Mutex<Tables>,
    failing: Mutex<HashMap<String, RemoteError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRemote {
    /// A backend with all tables and a small dataset unlike the local defaults.
    pub fn provisioned() -> Self {
        let tables = Tables {
            departments: vec![
                department("d-1", "Research"),
                department("d-2", "Support"),
            ],
            members: vec![
                member("r-1", "Rita Remote", "rita@remote.io", "Research"),
                member("r-2", "Sam Server", "sam@remote.io", "Research"),
                member("r-3", "Tom Ticket", "tom@remote.io", "Support"),
            ],
            leave_requests: vec![
                leave("l-1", "r-1", "Rita Remote", "2025-07-01", "2025-07-05"),
                leave("l-2", "r-1", "Rita Remote", "2025-08-10", "2025-08-10"),
                leave("l-3", "r-3", "Tom Ticket", "2025-07-03", "2025-07-04"),
            ],
        };

        Self {
            provisioned: true,
            tables: Mutex::new(tables),
            failing: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A reachable backend without any of the tables.
    pub fn unprovisioned() -> Self {
        Self {
            provisioned: false,
            tables: Mutex::new(Tables::default()),
            failing: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every later call of `operation` fail. A failing ping is a lost
    /// connection, anything else a rejected statement.
    pub fn fail(&self, operation: &str) {
        let error = if operation == "ping" {
            RemoteError::Connection("connection refused".to_string())
        } else {
            RemoteError::Database {
                code: Some("XX000".to_string()),
                message: format!("{} rejected", operation),
            }
        };
        self.fail_with(operation, error);
    }

    pub fn fail_with(&self, operation: &str, error: RemoteError) {
        self.failing
            .lock()
            .unwrap()
            .insert(operation.to_string(), error);
    }

    pub fn recover(&self, operation: &str) {
        self.failing.lock().unwrap().remove(operation);
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn departments(&self) -> Vec<Department> {
        self.tables.lock().unwrap().departments.clone()
    }

    pub fn members(&self) -> Vec<TeamMember> {
        self.tables.lock().unwrap().members.clone()
    }

    pub fn leave_requests(&self) -> Vec<LeaveRequest> {
        self.tables.lock().unwrap().leave_requests.clone()
    }

    fn enter(&self, operation: &str) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(operation.to_string());

        match self.failing.lock().unwrap().get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn require_table(&self, table: &str) -> RemoteResult<()> {
        if self.provisioned {
            Ok(())
        } else {
            Err(RemoteError::Database {
                code: Some("42P01".to_string()),
                message: format!("relation \"public.{}\" does not exist", table),
            })
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn ping(&self) -> RemoteResult<()> {
        self.enter("ping")
    }

    async fn catalog_tables(&self, tables: &[&str]) -> RemoteResult<Vec<String>> {
        self.enter("catalog_tables")?;
        if !self.provisioned {
            return Ok(Vec::new());
        }
        Ok(tables
            .iter()
            .filter(|t| REQUIRED_TABLES.contains(*t))
            .map(|t| t.to_string())
            .collect())
    }

    async fn check_table_exists(&self, table: &str) -> RemoteResult<bool> {
        self.enter("check_table_exists")?;
        Ok(self.provisioned && REQUIRED_TABLES.contains(&table))
    }

    async fn probe_table(&self, table: &str) -> RemoteResult<()> {
        self.enter("probe_table")?;
        self.require_table(table)
    }

    async fn list_departments(&self) -> RemoteResult<Vec<Department>> {
        self.enter("list_departments")?;
        self.require_table("departments")?;
        Ok(self.departments())
    }

    async fn list_members(&self) -> RemoteResult<Vec<TeamMember>> {
        self.enter("list_members")?;
        self.require_table("team_members")?;
        Ok(self.members())
    }

    async fn list_leave_requests(&self) -> RemoteResult<Vec<LeaveRequest>> {
        self.enter("list_leave_requests")?;
        self.require_table("leave_requests")?;
        Ok(self.leave_requests())
    }

    async fn insert_department(&self, department: &Department) -> RemoteResult<Department> {
        self.enter("insert_department")?;
        let mut tables = self.tables.lock().unwrap();
        tables.departments.push(department.clone());
        Ok(department.clone())
    }

    async fn update_department(&self, id: &str, update: &DepartmentUpdate) -> RemoteResult<Department> {
        self.enter("update_department")?;
        let mut tables = self.tables.lock().unwrap();
        let department = tables
            .departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RemoteError::NotFound(format!("Department {}", id)))?;
        department.name = update.name.clone();
        department.description = update.description.clone();
        Ok(department.clone())
    }

    async fn delete_department(&self, id: &str) -> RemoteResult<()> {
        self.enter("delete_department")?;
        self.tables.lock().unwrap().departments.retain(|d| d.id != id);
        Ok(())
    }

    async fn insert_member(&self, member: &TeamMember) -> RemoteResult<TeamMember> {
        self.enter("insert_member")?;
        let mut tables = self.tables.lock().unwrap();
        if tables.members.iter().any(|m| m.email == member.email) {
            return Err(RemoteError::Database {
                code: Some("23505".to_string()),
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }
        tables.members.push(member.clone());
        Ok(member.clone())
    }

    async fn update_member(&self, id: &str, update: &MemberUpdate) -> RemoteResult<TeamMember> {
        self.enter("update_member")?;
        let mut tables = self.tables.lock().unwrap();
        let member = tables
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| RemoteError::NotFound(format!("Member {}", id)))?;
        member.name = update.name.clone();
        member.email = update.email.clone();
        member.department = update.department.clone();
        member.avatar = update.avatar.clone();
        Ok(member.clone())
    }

    async fn delete_member(&self, id: &str) -> RemoteResult<()> {
        self.enter("delete_member")?;
        self.tables.lock().unwrap().members.retain(|m| m.id != id);
        Ok(())
    }

    async fn rename_members_department(&self, old: &str, new: &str) -> RemoteResult<Vec<String>> {
        self.enter("rename_members_department")?;
        let mut tables = self.tables.lock().unwrap();
        let mut moved = Vec::new();
        for member in tables.members.iter_mut().filter(|m| m.department == old) {
            member.department = new.to_string();
            moved.push(member.id.clone());
        }
        Ok(moved)
    }

    async fn reassign_members(&self, member_ids: &[String], department: &str) -> RemoteResult<u64> {
        self.enter("reassign_members")?;
        let mut tables = self.tables.lock().unwrap();
        let mut count = 0;
        for member in tables
            .members
            .iter_mut()
            .filter(|m| member_ids.contains(&m.id))
        {
            member.department = department.to_string();
            count += 1;
        }
        Ok(count)
    }

    async fn insert_leave_request(&self, leave: &LeaveRequest) -> RemoteResult<LeaveRequest> {
        self.enter("insert_leave_request")?;
        self.tables.lock().unwrap().leave_requests.push(leave.clone());
        Ok(leave.clone())
    }

    async fn update_leave_request(&self, id: &str, update: &LeaveUpdate) -> RemoteResult<LeaveRequest> {
        self.enter("update_leave_request")?;
        let mut tables = self.tables.lock().unwrap();
        let leave = tables
            .leave_requests
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| RemoteError::NotFound(format!("Leave request {}", id)))?;
        leave.start_date = update.start_date;
        leave.end_date = update.end_date;
        leave.leave_type = update.leave_type;
        leave.reason = update.reason.clone();
        Ok(leave.clone())
    }

    async fn delete_leave_request(&self, id: &str) -> RemoteResult<()> {
        self.enter("delete_leave_request")?;
        self.tables.lock().unwrap().leave_requests.retain(|l| l.id != id);
        Ok(())
    }

    async fn rename_leave_employee(&self, employee_id: &str, name: &str) -> RemoteResult<u64> {
        self.enter("rename_leave_employee")?;
        let mut tables = self.tables.lock().unwrap();
        let mut count = 0;
        for leave in tables
            .leave_requests
            .iter_mut()
            .filter(|l| l.employee_id == employee_id)
        {
            leave.employee_name = name.to_string();
            count += 1;
        }
        Ok(count)
    }

    async fn delete_leave_requests_for(&self, employee_id: &str) -> RemoteResult<u64> {
        self.enter("delete_leave_requests_for")?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.leave_requests.len();
        tables.leave_requests.retain(|l| l.employee_id != employee_id);
        Ok((before - tables.leave_requests.len()) as u64)
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn department(id: &str, name: &str) -> Department {
    Department {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        created_date: date("2024-06-01"),
    }
}

fn member(id: &str, name: &str, email: &str, department: &str) -> TeamMember {
    TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        department: department.to_string(),
        avatar: None,
    }
}

fn leave(id: &str, employee_id: &str, employee_name: &str, start: &str, end: &str) -> LeaveRequest {
    LeaveRequest {
        id: id.to_string(),
        employee_name: employee_name.to_string(),
        employee_id: employee_id.to_string(),
        start_date: date(start),
        end_date: date(end),
        leave_type: LeaveType::Vacation,
        reason: "Time off".to_string(),
        submitted_date: date("2025-06-01"),
    }
}
