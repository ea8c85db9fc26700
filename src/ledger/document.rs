//! Fallback ledger store (document API)
//!
//! Talks to a schemaless document service over REST: one collection of
//! ledger documents, created with server-generated document ids and queried
//! by field equality. There is no uniqueness constraint here and `record`
//! always inserts; a failover write that races an ambiguously-committed
//! primary write can therefore duplicate an entry. That duplicate is
//! bounded (same `entry_id` field in both copies) and left to
//! reconciliation tooling rather than hidden behind a distributed
//! transaction.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::entry::{EntryPage, LedgerEntry, StoredEntry};
use super::{LedgerStore, StoreError};

const STORE_NAME: &str = "document";

/// Connection settings for the document service.
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    /// Service endpoint, e.g. `https://docs.internal.example/v1/`
    pub endpoint: Url,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
    pub collection_id: String,
    pub timeout: Duration,
}

/// REST client for the fallback document store.
pub struct DocumentLedgerStore {
    http: reqwest::Client,
    config: DocumentStoreConfig,
}

impl DocumentLedgerStore {
    pub fn new(config: DocumentStoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::unavailable(STORE_NAME, e))?;

        Ok(Self { http, config })
    }

    fn documents_url(&self) -> Result<Url, StoreError> {
        self.config
            .endpoint
            .join(&format!(
                "databases/{}/collections/{}/documents",
                self.config.database_id, self.config.collection_id
            ))
            .map_err(|e| StoreError::query(STORE_NAME, e))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Project-Id", &self.config.project_id)
            .header("X-Api-Key", &self.config.api_key)
    }

    async fn list_side(&self, field: &str, bank_ref: &str) -> Result<DocumentList, StoreError> {
        let response = self
            .request(self.http.get(self.documents_url()?))
            .query(&[("queries[]", equality_query(field, bank_ref))])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }

        response
            .json::<DocumentList>()
            .await
            .map_err(|e| StoreError::query(STORE_NAME, e))
    }
}

#[async_trait]
impl LedgerStore for DocumentLedgerStore {
    fn name(&self) -> &'static str {
        STORE_NAME
    }

    async fn record(&self, entry: &LedgerEntry) -> Result<StoredEntry, StoreError> {
        // Server-generated document id: inserts never conflict, duplicates
        // are possible and accepted (see module docs).
        let body = serde_json::json!({
            "documentId": "unique()",
            "data": entry,
        });

        let response = self
            .request(self.http.post(self.documents_url()?))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }

        let document: DocumentEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::query(STORE_NAME, e))?;

        debug!(entry_id = %entry.entry_id, document_id = %document.id,
               "Recorded ledger entry in fallback store");
        Ok(document.into_stored())
    }

    async fn list_by_bank_ref(&self, bank_ref: &str) -> Result<EntryPage, StoreError> {
        let sent = self.list_side("senderBankRef", bank_ref).await?;
        let received = self.list_side("receiverBankRef", bank_ref).await?;

        // Totals are summed across both directions, matching the primary
        // store's two-sided listing.
        let total = sent.total + received.total;
        let entries = sent
            .documents
            .into_iter()
            .chain(received.documents)
            .map(DocumentEnvelope::into_stored)
            .collect();

        Ok(EntryPage { total, entries })
    }
}

/// Field-equality query in the document service's syntax.
fn equality_query(field: &str, value: &str) -> String {
    format!(r#"equal("{field}", ["{value}"])"#)
}

fn map_transport_error(e: reqwest::Error) -> StoreError {
    StoreError::unavailable(STORE_NAME, e)
}

fn map_status_error(status: reqwest::StatusCode, body: &str) -> StoreError {
    if status.is_server_error() {
        StoreError::unavailable(STORE_NAME, format!("{status}: {body}"))
    } else {
        StoreError::query(STORE_NAME, format!("{status}: {body}"))
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// One document as the service returns it: `$`-prefixed metadata plus the
/// entry fields flattened alongside.
#[derive(Debug, Deserialize)]
struct DocumentEnvelope {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$createdAt", default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "$updatedAt", default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    entry: LedgerEntry,
}

impl DocumentEnvelope {
    fn into_stored(self) -> StoredEntry {
        StoredEntry {
            entry: self.entry,
            store: STORE_NAME,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    total: u64,
    #[serde(default)]
    documents: Vec<DocumentEnvelope>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_query_syntax() {
        assert_eq!(
            equality_query("senderBankRef", "bank_1"),
            r#"equal("senderBankRef", ["bank_1"])"#
        );
    }

    #[test]
    fn test_document_envelope_parses_flattened_entry() {
        let raw = serde_json::json!({
            "$id": "doc_001",
            "$createdAt": "2026-08-06T12:00:00Z",
            "$updatedAt": "2026-08-06T12:00:00Z",
            "$permissions": [],
            "entryId": "4b4c8858-5b4b-4a6f-b21e-111111111111",
            "senderOwnerId": "user_1",
            "receiverOwnerId": "user_2",
            "senderBankRef": "bank_1",
            "receiverBankRef": "bank_2",
            "name": "rent",
            "amount": "120.00",
            "direction": "debit",
            "category": "Transfer",
            "channel": "online",
            "pending": false,
            "occurredAt": "2026-08-06",
            "initiatorContact": "user1@example.com"
        });

        let envelope: DocumentEnvelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.id, "doc_001");

        let stored = envelope.into_stored();
        assert_eq!(stored.store, "document");
        assert_eq!(stored.entry.sender_bank_ref, "bank_1");
        assert_eq!(stored.entry.amount_string(), "120.00");
        assert!(stored.created_at.is_some());
    }

    #[test]
    fn test_document_list_tolerates_missing_documents() {
        let list: DocumentList = serde_json::from_value(serde_json::json!({
            "total": 0
        }))
        .unwrap();
        assert_eq!(list.total, 0);
        assert!(list.documents.is_empty());
    }

    #[test]
    fn test_create_body_carries_entry_as_data() {
        let entry = LedgerEntry::confirmed_debit(
            "u1".into(),
            "u2".into(),
            "b1".into(),
            "b2".into(),
            "note".into(),
            "9.9".parse().unwrap(),
            "a@b.c".into(),
        );
        let body = serde_json::json!({
            "documentId": "unique()",
            "data": entry,
        });
        assert_eq!(body["documentId"], "unique()");
        assert_eq!(body["data"]["senderBankRef"], "b1");
        assert_eq!(body["data"]["amount"], "9.90");
    }
}
