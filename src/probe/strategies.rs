//! The three schema-presence strategies, tried in this order.

use async_trait::async_trait;

use super::{ProbeOutcome, ProbeStrategy};
use crate::remote::{RemoteError, RemoteStore};

/// PostgreSQL `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

/// Error text that means "this table does not exist".
const MISSING_RELATION_PATTERNS: [&str; 4] = ["relation", "does not exist", "table", "not found"];

/// Looks the tables up in `information_schema.tables`.
pub struct CatalogProbe;

#[async_trait]
impl ProbeStrategy for CatalogProbe {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn check(&self, remote: &dyn RemoteStore, tables: &[&str]) -> ProbeOutcome {
        match remote.catalog_tables(tables).await {
            Ok(found) => {
                tracing::debug!("Found tables: {:?}", found);
                if tables.iter().all(|t| found.iter().any(|f| f == t)) {
                    ProbeOutcome::Present
                } else {
                    ProbeOutcome::Absent
                }
            }
            Err(e) => {
                tracing::info!("Could not query information_schema: {}", e);
                ProbeOutcome::Inconclusive
            }
        }
    }
}

/// Calls the server-side `check_table_exists` function for each table.
pub struct StoredFunctionProbe;

#[async_trait]
impl ProbeStrategy for StoredFunctionProbe {
    fn name(&self) -> &'static str {
        "stored-function"
    }

    async fn check(&self, remote: &dyn RemoteStore, tables: &[&str]) -> ProbeOutcome {
        let mut answers = Vec::with_capacity(tables.len());
        for table in tables {
            answers.push(remote.check_table_exists(table).await);
        }

        if answers.iter().all(|a| a.is_err()) {
            tracing::info!("check_table_exists is not available");
            return ProbeOutcome::Inconclusive;
        }

        if answers.iter().all(|a| matches!(a, Ok(true))) {
            ProbeOutcome::Present
        } else {
            ProbeOutcome::Absent
        }
    }
}

/// Runs a zero-row query against each table and classifies the failures.
pub struct DirectProbe;

#[async_trait]
impl ProbeStrategy for DirectProbe {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn check(&self, remote: &dyn RemoteStore, tables: &[&str]) -> ProbeOutcome {
        let mut found = 0;
        for table in tables {
            match remote.probe_table(table).await {
                Ok(()) => found += 1,
                Err(e) if table_exists_despite(&e) => {
                    tracing::warn!("Treating {} as present despite error: {}", table, e);
                    found += 1;
                }
                Err(e) => tracing::debug!("Table {} missing: {}", table, e),
            }
        }

        tracing::info!("Direct check found {}/{} tables", found, tables.len());
        if found == tables.len() {
            ProbeOutcome::Present
        } else {
            ProbeOutcome::Absent
        }
    }
}

/// Whether a failed direct probe still implies the table exists.
///
/// A structured "undefined table" code and connection failures mean missing.
/// Otherwise the message is matched against [`MISSING_RELATION_PATTERNS`]; an
/// error that matches none of them is some unrelated failure on a table that
/// is there.
pub(crate) fn table_exists_despite(error: &RemoteError) -> bool {
    if error.code() == Some(UNDEFINED_TABLE) {
        return false;
    }

    match error {
        RemoteError::Connection(_) | RemoteError::NotFound(_) => false,
        RemoteError::Database { message, .. }
        | RemoteError::Decode(message)
        | RemoteError::Query(message) => !mentions_missing_relation(message),
    }
}

fn mentions_missing_relation(message: &str) -> bool {
    let message = message.to_lowercase();
    MISSING_RELATION_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}
