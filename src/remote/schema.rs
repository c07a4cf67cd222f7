//! Provisioning of the remote schema.

use super::{RemoteResult, RemoteStore, SqlRemote};
use crate::seed;

const CREATE_TABLES: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_members (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        department TEXT NOT NULL,
        avatar_url TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id TEXT PRIMARY KEY,
        employee_name TEXT NOT NULL,
        employee_id TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        leave_type TEXT NOT NULL CHECK (leave_type IN ('vacation', 'sick', 'personal', 'maternity', 'paternity')),
        reason TEXT NOT NULL,
        submitted_date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CHECK (start_date <= end_date)
    )
    "#,
];

const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_team_members_department ON team_members(department)",
    "CREATE INDEX IF NOT EXISTS idx_leave_requests_employee_id ON leave_requests(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_leave_requests_start_date ON leave_requests(start_date)",
];

const CHECK_TABLE_EXISTS_FN: &str = r#"
    CREATE OR REPLACE FUNCTION check_table_exists(tbl TEXT) RETURNS BOOLEAN
    LANGUAGE sql STABLE AS $$
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = tbl
        )
    $$
"#;

/// Create the tables (and on PostgreSQL the lookup function). With `seed`,
/// fill any empty table with the default records.
pub async fn provision(remote: &SqlRemote, seed: bool) -> RemoteResult<()> {
    for statement in CREATE_TABLES.iter().chain(CREATE_INDEXES.iter()) {
        sqlx::query(statement).execute(remote.pool()).await?;
    }

    if remote.is_postgres() {
        sqlx::query(CHECK_TABLE_EXISTS_FN)
            .execute(remote.pool())
            .await?;
    }

    tracing::info!("Remote schema provisioned");

    if seed {
        seed_defaults(remote).await?;
    }

    Ok(())
}

async fn seed_defaults(remote: &SqlRemote) -> RemoteResult<()> {
    if remote.list_departments().await?.is_empty() {
        for department in seed::default_departments() {
            remote.insert_department(&department).await?;
        }
        tracing::info!("Seeded default departments");
    }

    if remote.list_members().await?.is_empty() {
        for member in seed::default_members() {
            remote.insert_member(&member).await?;
        }
        tracing::info!("Seeded default team members");
    }

    if remote.list_leave_requests().await?.is_empty() {
        for leave in seed::default_leave_requests() {
            remote.insert_leave_request(&leave).await?;
        }
        tracing::info!("Seeded default leave requests");
    }

    Ok(())
}
