//! Transfer-eligibility validation
//!
//! A bank record may only reach the rail client if its funding-source handle
//! is a well-formed URL inside the rail's funding-source namespace and its
//! owner id normalizes to a non-empty string. Checks run in that order and
//! fail fast on the first violation, reporting which rule broke.
//!
//! Pure: no I/O, no side effects. The orchestrator runs this once per side
//! before any external call, so a receiver with a broken funding source
//! never costs a rail round trip.

use url::Url;

use super::models::{BankRecord, OwnerIdError};

/// Path segment that marks the rail's funding-source namespace.
pub const FUNDING_SOURCE_SEGMENT: &str = "funding-sources";

/// Eligibility failures, in check order
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Bank record has no funding source handle")]
    MissingFundingSource,

    #[error("Funding source handle is not an absolute URL: '{got}'")]
    MalformedFundingSource { got: String },

    #[error("Funding source handle must use http or https, got '{scheme}'")]
    UnsupportedScheme { scheme: String },

    #[error("Funding source handle is outside the '{FUNDING_SOURCE_SEGMENT}' namespace: '{got}'")]
    OutsideFundingNamespace { got: String },

    #[error("Owner id rejected: {0}")]
    Owner(#[from] OwnerIdError),
}

impl ValidationError {
    /// Stable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFundingSource => "FUNDING_SOURCE_MISSING",
            ValidationError::MalformedFundingSource { .. } => "FUNDING_SOURCE_MALFORMED",
            ValidationError::UnsupportedScheme { .. } => "FUNDING_SOURCE_SCHEME",
            ValidationError::OutsideFundingNamespace { .. } => "FUNDING_SOURCE_NAMESPACE",
            ValidationError::Owner(e) => e.code(),
        }
    }
}

/// A bank record that passed eligibility validation.
///
/// Construction goes through [`validate_for_transfer`] only, so holding one
/// of these is proof the record can face the rail.
#[derive(Debug, Clone)]
pub struct EligibleBank {
    /// Local reference of the underlying record
    pub bank_ref: String,
    /// Rail account id of the underlying record
    pub account_id: String,
    /// Normalized owner id
    pub owner_id: String,
    /// Validated funding-source handle
    pub funding_source: Url,
}

/// Validate a bank record for use as a transfer endpoint.
pub fn validate_for_transfer(record: &BankRecord) -> Result<EligibleBank, ValidationError> {
    let handle = record
        .funding_source_handle
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(ValidationError::MissingFundingSource)?;

    let funding_source =
        Url::parse(handle).map_err(|_| ValidationError::MalformedFundingSource {
            got: handle.to_string(),
        })?;

    match funding_source.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    }

    let in_namespace = funding_source
        .path_segments()
        .is_some_and(|mut segments| segments.any(|s| s == FUNDING_SOURCE_SEGMENT));
    if !in_namespace {
        return Err(ValidationError::OutsideFundingNamespace {
            got: handle.to_string(),
        });
    }

    let owner_id = record.owner_id.normalize()?;

    Ok(EligibleBank {
        bank_ref: record.id.clone(),
        account_id: record.account_id.clone(),
        owner_id,
        funding_source,
    })
}
