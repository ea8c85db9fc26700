//! Durable ledger recording
//!
//! One [`LedgerEntry`] per transfer, persisted through the [`LedgerStore`]
//! capability trait. Two independent implementations exist:
//!
//! - [`postgres::PgLedgerStore`] - the primary store; relational, idempotent
//!   upsert on the entry id
//! - [`document::DocumentLedgerStore`] - the fallback store; schemaless
//!   document API, insert-only
//!
//! The orchestrator composes them by explicit sequential fallback. Neither
//! store knows about the other.

pub mod categories;
pub mod document;
pub mod entry;
pub mod postgres;

pub use categories::{CategoryCount, count_categories};
pub use document::DocumentLedgerStore;
pub use entry::{Direction, EntryPage, LedgerEntry, StoredEntry};
pub use postgres::PgLedgerStore;

use async_trait::async_trait;

/// Store failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or did not answer in time
    #[error("Store '{store}' unavailable: {detail}")]
    Unavailable { store: &'static str, detail: String },

    /// The store answered but the operation failed
    #[error("Store '{store}' query failed: {detail}")]
    Query { store: &'static str, detail: String },
}

impl StoreError {
    pub fn unavailable(store: &'static str, detail: impl ToString) -> Self {
        StoreError::Unavailable {
            store,
            detail: detail.to_string(),
        }
    }

    pub fn query(store: &'static str, detail: impl ToString) -> Self {
        StoreError::Query {
            store,
            detail: detail.to_string(),
        }
    }

    /// Which store reported the failure
    pub fn store(&self) -> &'static str {
        match self {
            StoreError::Unavailable { store, .. } | StoreError::Query { store, .. } => store,
        }
    }

    /// Stable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
            StoreError::Query { .. } => "STORE_QUERY_FAILED",
        }
    }
}

/// Capability interface shared by the primary and fallback ledger stores.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Store name for logging and error attribution
    fn name(&self) -> &'static str;

    /// Persist one ledger entry.
    ///
    /// The primary implementation is an idempotent upsert on the entry id;
    /// the fallback always inserts. Both are bounded by a timeout.
    async fn record(&self, entry: &LedgerEntry) -> Result<StoredEntry, StoreError>;

    /// List entries where the given bank ref is the sender or the receiver.
    ///
    /// The two sides are unioned without deduplication and the page total is
    /// the sum of both match counts: a transfer is intentionally visible
    /// from both histories.
    async fn list_by_bank_ref(&self, bank_ref: &str) -> Result<EntryPage, StoreError>;
}
