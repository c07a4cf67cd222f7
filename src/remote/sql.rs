//! SQL implementation of [`RemoteStore`] over `sqlx::AnyPool`.
//!
//! PostgreSQL is the production target; SQLite URLs are accepted for local
//! development and tests. Statements stick to the common dialect (`$n`
//! placeholders, `RETURNING`, `CURRENT_TIMESTAMP`).

use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::{AnyPool, Row};
use std::time::Duration;

use super::rows::{
    collect, department_from_row, format_date, leave_from_row, member_from_row,
    DEPARTMENT_COLUMNS, LEAVE_COLUMNS, MEMBER_COLUMNS,
};
use super::{RemoteError, RemoteResult, RemoteStore, REQUIRED_TABLES};
use crate::config::RemoteCredentials;
use crate::models::{
    Department, DepartmentUpdate, LeaveRequest, LeaveUpdate, MemberUpdate, TeamMember,
};

/// Remote store reached through a lazily connecting pool.
#[derive(Clone)]
pub struct SqlRemote {
    pool: AnyPool,
    postgres: bool,
}

impl SqlRemote {
    /// Build the pool without opening a connection. The access key becomes
    /// the password of PostgreSQL URLs.
    pub fn connect_lazy(credentials: &RemoteCredentials) -> RemoteResult<Self> {
        sqlx::any::install_default_drivers();

        let mut url = url::Url::parse(&credentials.url)
            .map_err(|e| RemoteError::Query(format!("invalid remote URL: {}", e)))?;
        let postgres = matches!(url.scheme(), "postgres" | "postgresql");

        if postgres && url.set_password(Some(&credentials.key)).is_err() {
            return Err(RemoteError::Query(
                "remote URL cannot carry an access key".to_string(),
            ));
        }

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(url.as_str())?;

        Ok(Self { pool, postgres })
    }

    pub fn is_postgres(&self) -> bool {
        self.postgres
    }

    pub(crate) fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

/// Only the fixed table names may be interpolated into statements.
fn known_table(table: &str) -> RemoteResult<&str> {
    REQUIRED_TABLES
        .iter()
        .find(|t| **t == table)
        .copied()
        .ok_or_else(|| RemoteError::Query(format!("unknown table {}", table)))
}

#[async_trait]
impl RemoteStore for SqlRemote {
    async fn ping(&self) -> RemoteResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn catalog_tables(&self, tables: &[&str]) -> RemoteResult<Vec<String>> {
        let placeholders: Vec<String> = (1..=tables.len()).map(|i| format!("${}", i)).collect();
        let sql = format!(
            "SELECT CAST(table_name AS TEXT) AS table_name FROM information_schema.tables WHERE table_schema = 'public' AND table_name IN ({})",
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for table in tables {
            query = query.bind(*table);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name").map_err(RemoteError::from))
            .collect()
    }

    async fn check_table_exists(&self, table: &str) -> RemoteResult<bool> {
        let row = sqlx::query("SELECT check_table_exists($1) AS present")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("present")?)
    }

    async fn probe_table(&self, table: &str) -> RemoteResult<()> {
        let sql = format!("SELECT 1 FROM {} LIMIT 0", known_table(table)?);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn list_departments(&self) -> RemoteResult<Vec<Department>> {
        let sql = format!("SELECT {} FROM departments ORDER BY name", DEPARTMENT_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        collect(rows, department_from_row)
    }

    async fn list_members(&self) -> RemoteResult<Vec<TeamMember>> {
        let sql = format!("SELECT {} FROM team_members ORDER BY name", MEMBER_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        collect(rows, member_from_row)
    }

    async fn list_leave_requests(&self) -> RemoteResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {} FROM leave_requests ORDER BY start_date DESC",
            LEAVE_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        collect(rows, leave_from_row)
    }

    async fn insert_department(&self, department: &Department) -> RemoteResult<Department> {
        let sql = format!(
            "INSERT INTO departments (id, name, description, created_date) VALUES ($1, $2, $3, $4) RETURNING {}",
            DEPARTMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&department.id)
            .bind(&department.name)
            .bind(&department.description)
            .bind(format_date(department.created_date))
            .fetch_one(&self.pool)
            .await?;
        department_from_row(&row)
    }

    async fn update_department(&self, id: &str, update: &DepartmentUpdate) -> RemoteResult<Department> {
        let sql = format!(
            "UPDATE departments SET name = $1, description = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3 RETURNING {}",
            DEPARTMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&update.name)
            .bind(&update.description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RemoteError::NotFound(format!("Department {}", id)))?;
        department_from_row(&row)
    }

    async fn delete_department(&self, id: &str) -> RemoteResult<()> {
        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_member(&self, member: &TeamMember) -> RemoteResult<TeamMember> {
        let sql = format!(
            "INSERT INTO team_members (id, name, email, department, avatar_url) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            MEMBER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&member.id)
            .bind(&member.name)
            .bind(&member.email)
            .bind(&member.department)
            .bind(&member.avatar)
            .fetch_one(&self.pool)
            .await?;
        member_from_row(&row)
    }

    async fn update_member(&self, id: &str, update: &MemberUpdate) -> RemoteResult<TeamMember> {
        let sql = format!(
            "UPDATE team_members SET name = $1, email = $2, department = $3, avatar_url = $4, updated_at = CURRENT_TIMESTAMP WHERE id = $5 RETURNING {}",
            MEMBER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&update.name)
            .bind(&update.email)
            .bind(&update.department)
            .bind(&update.avatar)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RemoteError::NotFound(format!("Member {}", id)))?;
        member_from_row(&row)
    }

    async fn delete_member(&self, id: &str) -> RemoteResult<()> {
        sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn rename_members_department(&self, old: &str, new: &str) -> RemoteResult<Vec<String>> {
        let rows = sqlx::query(
            "UPDATE team_members SET department = $1, updated_at = CURRENT_TIMESTAMP WHERE department = $2 RETURNING id",
        )
        .bind(new)
        .bind(old)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("id").map_err(RemoteError::from))
            .collect()
    }

    async fn reassign_members(&self, member_ids: &[String], department: &str) -> RemoteResult<u64> {
        if member_ids.is_empty() {
            return Ok(0);
        }

        let placeholders: Vec<String> = (0..member_ids.len()).map(|i| format!("${}", i + 2)).collect();
        let sql = format!(
            "UPDATE team_members SET department = $1, updated_at = CURRENT_TIMESTAMP WHERE id IN ({})",
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql).bind(department);
        for id in member_ids {
            query = query.bind(id);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn insert_leave_request(&self, leave: &LeaveRequest) -> RemoteResult<LeaveRequest> {
        let sql = format!(
            "INSERT INTO leave_requests (id, employee_name, employee_id, start_date, end_date, leave_type, reason, submitted_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            LEAVE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&leave.id)
            .bind(&leave.employee_name)
            .bind(&leave.employee_id)
            .bind(format_date(leave.start_date))
            .bind(format_date(leave.end_date))
            .bind(leave.leave_type.as_str())
            .bind(&leave.reason)
            .bind(format_date(leave.submitted_date))
            .fetch_one(&self.pool)
            .await?;
        leave_from_row(&row)
    }

    async fn update_leave_request(&self, id: &str, update: &LeaveUpdate) -> RemoteResult<LeaveRequest> {
        let sql = format!(
            "UPDATE leave_requests SET start_date = $1, end_date = $2, leave_type = $3, reason = $4, updated_at = CURRENT_TIMESTAMP WHERE id = $5 RETURNING {}",
            LEAVE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(format_date(update.start_date))
            .bind(format_date(update.end_date))
            .bind(update.leave_type.as_str())
            .bind(&update.reason)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RemoteError::NotFound(format!("Leave request {}", id)))?;
        leave_from_row(&row)
    }

    async fn delete_leave_request(&self, id: &str) -> RemoteResult<()> {
        sqlx::query("DELETE FROM leave_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn rename_leave_employee(&self, employee_id: &str, name: &str) -> RemoteResult<u64> {
        let result = sqlx::query(
            "UPDATE leave_requests SET employee_name = $1, updated_at = CURRENT_TIMESTAMP WHERE employee_id = $2",
        )
        .bind(name)
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_leave_requests_for(&self, employee_id: &str) -> RemoteResult<u64> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
