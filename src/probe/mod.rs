//! Backend availability prober.
//!
//! Decides whether the remote backend is configured and whether its three
//! tables exist. The schema check is an ordered list of strategies; the first
//! one that gives a definite answer wins. The whole check (connectivity ping
//! included) is raced against a timeout, and nothing it does can fail outward.

mod strategies;

pub use strategies::{CatalogProbe, DirectProbe, StoredFunctionProbe};

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::config::DEFAULT_PROBE_TIMEOUT;
use crate::remote::{RemoteError, RemoteHandle, RemoteStore};

/// Outcome of probing the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "message", rename_all = "camelCase")]
pub enum BackendDecision {
    Unconfigured,
    Ready,
    NotProvisioned,
    Error(String),
}

/// Answer of a single probe strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Present,
    Absent,
    Inconclusive,
}

/// One way of finding out whether the required tables exist.
#[async_trait]
pub trait ProbeStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self, remote: &dyn RemoteStore, tables: &[&str]) -> ProbeOutcome;
}

pub struct Prober {
    strategies: Vec<Box<dyn ProbeStrategy>>,
    tables: Vec<&'static str>,
    timeout: Duration,
}

impl Default for Prober {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl Prober {
    /// Catalog, then stored function, then direct table probes.
    pub fn new(timeout: Duration) -> Self {
        Self::with_strategies(
            vec![
                Box::new(CatalogProbe),
                Box::new(StoredFunctionProbe),
                Box::new(DirectProbe),
            ],
            timeout,
        )
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ProbeStrategy>>, timeout: Duration) -> Self {
        Self {
            strategies,
            tables: crate::remote::REQUIRED_TABLES.to_vec(),
            timeout,
        }
    }

    pub async fn probe(&self, remote: &RemoteHandle) -> BackendDecision {
        let store = match remote {
            RemoteHandle::Unconfigured => {
                tracing::info!("Remote backend not configured, using local storage");
                return BackendDecision::Unconfigured;
            }
            RemoteHandle::Unavailable(reason) => {
                return BackendDecision::Error(reason.clone());
            }
            RemoteHandle::Configured(store) => store.clone(),
        };

        tracing::info!("Remote backend configured, checking database setup...");

        match tokio::time::timeout(self.timeout, self.check_schema(store.as_ref())).await {
            Ok(decision) => decision,
            Err(_) => {
                tracing::warn!("Database check timed out after {:?}", self.timeout);
                BackendDecision::Error("Database check timeout".to_string())
            }
        }
    }

    async fn check_schema(&self, store: &dyn RemoteStore) -> BackendDecision {
        if let Err(e) = store.ping().await {
            tracing::warn!("Remote backend unreachable: {}", e);
            let reason = match e {
                RemoteError::Connection(message) => message,
                other => other.to_string(),
            };
            return BackendDecision::Error(reason);
        }

        for strategy in &self.strategies {
            let outcome = strategy.check(store, &self.tables).await;
            tracing::debug!(strategy = strategy.name(), ?outcome, "Probe strategy finished");

            match outcome {
                ProbeOutcome::Present => {
                    tracing::info!("All required tables found ({})", strategy.name());
                    return BackendDecision::Ready;
                }
                ProbeOutcome::Absent => {
                    tracing::info!("Required tables missing ({})", strategy.name());
                    return BackendDecision::NotProvisioned;
                }
                ProbeOutcome::Inconclusive => continue,
            }
        }

        tracing::warn!("No probe strategy could determine the schema state");
        BackendDecision::NotProvisioned
    }
}
