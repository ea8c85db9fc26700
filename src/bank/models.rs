//! Bank record model and owner-id normalization
//!
//! Upstream systems disagree about the shape of a record's owner id: some
//! send a plain string, some wrap it in an object keyed by `$id`/`id`/
//! `userId`, and some wrap either of those in a singleton list. [`OwnerRef`]
//! models exactly those shapes as a tagged union with one recursive
//! normalization function; anything else lands in the `Unsupported` arm and
//! is rejected by name, never string-matched into submission.

use serde::{Deserialize, Serialize};

/// A linked bank account capable of sending or receiving funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankRecord {
    /// Store-assigned local reference ("bank ref")
    pub id: String,
    /// Owner identifier as received from upstream; normalize before use
    pub owner_id: OwnerRef,
    /// Identifier in the rail's account space
    pub account_id: String,
    /// URL-shaped handle into the rail's funding-source namespace
    pub funding_source_handle: Option<String>,
    /// Codec output over `account_id`, exchanged with counterparties
    pub shareable_token: String,
}

/// Owner id as it arrives from upstream.
///
/// Untagged: strings become `Id`, maps become `Keyed`, arrays become `Many`,
/// everything else (numbers, booleans, null) becomes `Unsupported`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(String),
    Keyed(KeyedOwner),
    Many(Vec<OwnerRef>),
    Unsupported(serde_json::Value),
}

/// Object-shaped owner id. Field precedence on normalization: `$id`, `id`,
/// `userId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedOwner {
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Normalization failures for owner ids
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OwnerIdError {
    #[error("Owner id is empty after trimming")]
    Empty,

    #[error("Owner object carries none of the known id fields ($id, id, userId)")]
    NoIdField,

    #[error("Owner list is empty")]
    EmptyList,

    #[error("Owner list nests deeper than one level")]
    NestedTooDeep,

    #[error("Owner id has an unsupported shape: {kind}")]
    UnsupportedShape { kind: &'static str },
}

impl OwnerIdError {
    /// Stable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            OwnerIdError::Empty => "OWNER_ID_EMPTY",
            OwnerIdError::NoIdField => "OWNER_ID_NO_FIELD",
            OwnerIdError::EmptyList => "OWNER_ID_EMPTY_LIST",
            OwnerIdError::NestedTooDeep => "OWNER_ID_NESTED",
            OwnerIdError::UnsupportedShape { .. } => "OWNER_ID_UNSUPPORTED",
        }
    }
}

impl OwnerRef {
    /// Collapse the upstream shape into a single trimmed, non-empty string.
    ///
    /// String passthrough; keyed object by field precedence; singleton list
    /// by first element, recursing at most one level.
    pub fn normalize(&self) -> Result<String, OwnerIdError> {
        self.normalize_at(0)
    }

    fn normalize_at(&self, depth: u8) -> Result<String, OwnerIdError> {
        match self {
            OwnerRef::Id(s) => trimmed_non_empty(s),
            OwnerRef::Keyed(k) => {
                let candidate = k
                    .doc_id
                    .as_deref()
                    .or(k.id.as_deref())
                    .or(k.user_id.as_deref())
                    .ok_or(OwnerIdError::NoIdField)?;
                trimmed_non_empty(candidate)
            }
            OwnerRef::Many(items) => {
                if depth >= 1 {
                    return Err(OwnerIdError::NestedTooDeep);
                }
                let first = items.first().ok_or(OwnerIdError::EmptyList)?;
                first.normalize_at(depth + 1)
            }
            OwnerRef::Unsupported(value) => Err(OwnerIdError::UnsupportedShape {
                kind: json_kind(value),
            }),
        }
    }
}

fn trimmed_non_empty(s: &str) -> Result<String, OwnerIdError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(OwnerIdError::Empty);
    }
    Ok(trimmed.to_string())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
