//! Local persistence adapter.
//!
//! Stores each collection as a camelCase JSON array under a fixed key. Loading
//! never fails outward: missing or corrupt data reads as an empty collection.
//! Saving is fire-and-forget and does nothing when the store is detached.

mod kv;

use kv::SqliteKv;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::models::{Department, LeaveRequest, TeamMember};
use crate::seed;

/// The three logical collections kept in the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Members,
    LeaveRequests,
    Departments,
}

impl Collection {
    /// Storage key for this collection.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Members => "team-leave-app-members",
            Collection::LeaveRequests => "team-leave-app-leaves",
            Collection::Departments => "team-leave-app-departments",
        }
    }
}

/// Handle to the local key-value store.
#[derive(Clone)]
pub struct LocalStore {
    kv: Option<SqliteKv>,
}

impl LocalStore {
    /// Open the durable store at `path`.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        let kv = SqliteKv::open(path).await?;
        Ok(Self { kv: Some(kv) })
    }

    /// A store with nothing behind it: loads are empty and saves are dropped.
    pub fn detached() -> Self {
        Self { kv: None }
    }

    pub fn is_detached(&self) -> bool {
        self.kv.is_none()
    }

    /// Persist `items` under the collection's key.
    pub async fn save<T: Serialize>(&self, collection: Collection, items: &[T]) {
        let Some(kv) = &self.kv else {
            return;
        };

        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Error serializing {}: {}", collection.key(), e);
                return;
            }
        };

        if let Err(e) = kv.set(collection.key(), &json).await {
            tracing::error!("Error saving {}: {}", collection.key(), e);
        }
    }

    /// Read the collection, or an empty one if absent or unreadable.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let Some(kv) = &self.kv else {
            return Vec::new();
        };

        let stored = match kv.get(collection.key()).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Error reading {}: {}", collection.key(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&stored).unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable {}: {}", collection.key(), e);
            Vec::new()
        })
    }

    pub async fn load_members(&self) -> Vec<TeamMember> {
        self.load(Collection::Members).await
    }

    pub async fn load_leave_requests(&self) -> Vec<LeaveRequest> {
        self.load(Collection::LeaveRequests).await
    }

    pub async fn load_departments(&self) -> Vec<Department> {
        self.load(Collection::Departments).await
    }

    /// Seed the default records into every collection that has never been
    /// written. Default leave requests are only seeded for members that exist.
    pub async fn initialize_defaults(&self) {
        if self.is_detached() {
            return;
        }

        if self.never_written(Collection::Departments).await {
            self.save(Collection::Departments, &seed::default_departments())
                .await;
        }
        if self.never_written(Collection::Members).await {
            self.save(Collection::Members, &seed::default_members()).await;
        }
        if self.never_written(Collection::LeaveRequests).await {
            let members = self.load_members().await;
            let leaves: Vec<LeaveRequest> = seed::default_leave_requests()
                .into_iter()
                .filter(|l| members.iter().any(|m| m.id == l.employee_id))
                .collect();
            self.save(Collection::LeaveRequests, &leaves).await;
        }
    }

    /// Whether the collection's key is absent. A read failure counts as
    /// written so that stored data is never overwritten with defaults.
    async fn never_written(&self, collection: Collection) -> bool {
        let Some(kv) = &self.kv else {
            return false;
        };

        match kv.get(collection.key()).await {
            Ok(stored) => stored.is_none(),
            Err(e) => {
                tracing::warn!("Error reading {}: {}", collection.key(), e);
                false
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn write_raw(&self, collection: Collection, raw: &str) {
        if let Some(kv) = &self.kv {
            kv.set(collection.key(), raw).await.unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::models::LeaveType;

    async fn open_store(dir: &TempDir) -> LocalStore {
        LocalStore::open(&dir.path().join("local.sqlite"))
            .await
            .expect("Failed to open local store")
    }

    #[tokio::test]
    async fn test_never_written_key_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        assert!(store.load_members().await.is_empty());
        assert!(store.load_leave_requests().await.is_empty());
        assert!(store.load_departments().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_returns_same_items() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let leaves = vec![LeaveRequest {
            id: "abc".to_string(),
            employee_name: "Eva Brown".to_string(),
            employee_id: "5".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            leave_type: LeaveType::Sick,
            reason: "Flu".to_string(),
            submitted_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        }];
        store.save(Collection::LeaveRequests, &leaves).await;
        store
            .save(Collection::Members, &seed::default_members())
            .await;

        assert_eq!(store.load_leave_requests().await, leaves);
        assert_eq!(store.load_members().await, seed::default_members());
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir).await;
            store
                .save(Collection::Departments, &seed::default_departments())
                .await;
        }

        let store = open_store(&dir).await;
        assert_eq!(store.load_departments().await.len(), 5);
    }

    #[tokio::test]
    async fn test_corrupt_value_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.write_raw(Collection::Members, "{not json").await;
        assert!(store.load_members().await.is_empty());

        store
            .write_raw(Collection::Departments, r#"[{"id": 1}]"#)
            .await;
        assert!(store.load_departments().await.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_defaults_only_fills_unwritten_collections() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let custom = vec![TeamMember {
            id: "m-1".to_string(),
            name: "Only Member".to_string(),
            email: "only@company.com".to_string(),
            department: "Engineering".to_string(),
            avatar: None,
        }];
        store.save(Collection::Members, &custom).await;

        store.initialize_defaults().await;

        assert_eq!(store.load_members().await, custom);
        assert_eq!(store.load_departments().await.len(), 5);
        // default requests belong to members that are not there
        assert!(store.load_leave_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_emptied_collection_is_not_reseeded() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.initialize_defaults().await;
        assert_eq!(store.load_leave_requests().await.len(), 3);

        store
            .save::<LeaveRequest>(Collection::LeaveRequests, &[])
            .await;
        store.save::<TeamMember>(Collection::Members, &[]).await;
        store.initialize_defaults().await;

        assert!(store.load_leave_requests().await.is_empty());
        assert!(store.load_members().await.is_empty());
        assert_eq!(store.load_departments().await.len(), 5);
    }

    #[tokio::test]
    async fn test_detached_store_is_inert() {
        let store = LocalStore::detached();

        store
            .save(Collection::Members, &seed::default_members())
            .await;
        store.initialize_defaults().await;

        assert!(store.load_members().await.is_empty());
    }
}
