//! Gateway handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::ledger::{CategoryCount, EntryPage, LedgerStore, StoreError, StoredEntry, count_categories};
use crate::transfer::{TransferError, TransferOutcome, TransferRequest};

use super::state::AppState;
use super::types::{ApiError, ApiResponse, ApiResult, error_codes, ok};

// ============================================================================
// POST /v1/transfers
// ============================================================================

/// Transfer submission, mirroring the payment form upstream.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferApiRequest {
    /// Local reference of the sender's bank record
    #[validate(length(min = 1, message = "Please select a valid bank account"))]
    pub sender_bank: String,
    /// Shareable token of the receiving account
    #[validate(length(min = 8, message = "Please enter a valid sharable Id"))]
    pub sharable_id: String,
    /// Amount as string (to avoid float precision issues)
    pub amount: String,
    /// Transfer note
    #[validate(length(min = 4, message = "Transfer note is too short"))]
    pub name: String,
    /// Initiator contact, recorded on the ledger entry
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferApiResponse {
    /// Terminal outcome code (e.g. SUCCESS, DESTINATION_REJECTED)
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<StoredEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_fallback: Option<bool>,
    /// Rail confirmation handle, present when money moved but recording failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rail_confirmation: Option<String>,
    /// Whether resubmitting the same request is safe
    pub retry_safe: bool,
    /// Money moved without a durable local record; surface loudly
    pub urgent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferApiRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransferApiResponse>>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Invalid transfer request: {e}")))?;

    let amount: Decimal = req
        .amount
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid amount: '{}'", req.amount)))?;

    let outcome = state
        .orchestrator
        .initiate(TransferRequest {
            sender_bank_ref: req.sender_bank,
            receiver_token: req.sharable_id,
            amount,
            note: req.name,
            initiator_contact: req.email,
        })
        .await
        .map_err(map_internal_error)?;

    let (status, body) = outcome_response(outcome);
    Ok((status, Json(body)))
}

fn map_internal_error(e: TransferError) -> ApiError {
    match e {
        TransferError::Directory(store) => {
            ApiError::service_unavailable(format!("Bank directory unavailable: {store}"))
        }
        other => ApiError::internal(other.to_string()),
    }
}

/// Map a terminal outcome onto HTTP status + envelope.
fn outcome_response(outcome: TransferOutcome) -> (StatusCode, ApiResponse<TransferApiResponse>) {
    let status_code = outcome.code();
    match outcome {
        TransferOutcome::Success {
            entry,
            used_fallback,
        } => (
            StatusCode::OK,
            ApiResponse::success(TransferApiResponse {
                status: status_code,
                entry: Some(entry),
                used_fallback: Some(used_fallback),
                rail_confirmation: None,
                retry_safe: false,
                urgent: false,
                detail: None,
            }),
        ),
        TransferOutcome::ValidationRejected { reason, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse::outcome(
                error_codes::VALIDATION_REJECTED,
                TransferApiResponse {
                    status: status_code,
                    entry: None,
                    used_fallback: None,
                    rail_confirmation: None,
                    retry_safe: true,
                    urgent: false,
                    detail: Some(reason.clone()),
                },
                reason,
            ),
        ),
        TransferOutcome::RailRejected { detail, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse::outcome(
                error_codes::RAIL_REJECTED,
                TransferApiResponse {
                    status: status_code,
                    entry: None,
                    used_fallback: None,
                    rail_confirmation: None,
                    // Retryable once the rejected funding source or balance
                    // is fixed; the request itself may be resubmitted.
                    retry_safe: true,
                    urgent: false,
                    detail: Some(detail.clone()),
                },
                detail,
            ),
        ),
        TransferOutcome::Indeterminate { detail } => (
            StatusCode::CONFLICT,
            ApiResponse::outcome(
                error_codes::INDETERMINATE,
                TransferApiResponse {
                    status: status_code,
                    entry: None,
                    used_fallback: None,
                    rail_confirmation: None,
                    // Resubmitting an indeterminate transfer risks moving
                    // money twice; reconcile against the rail first.
                    retry_safe: false,
                    urgent: false,
                    detail: Some(detail.clone()),
                },
                detail,
            ),
        ),
        TransferOutcome::RecordingFailed {
            rail_confirmation,
            detail,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::outcome(
                error_codes::RECORDING_FAILED,
                TransferApiResponse {
                    status: status_code,
                    entry: None,
                    used_fallback: None,
                    rail_confirmation: Some(rail_confirmation),
                    retry_safe: false,
                    urgent: true,
                    detail: Some(detail.clone()),
                },
                detail,
            ),
        ),
    }
}

// ============================================================================
// GET /v1/banks/{bank_ref}/transactions
// ============================================================================

pub async fn list_bank_transactions(
    State(state): State<Arc<AppState>>,
    Path(bank_ref): Path<String>,
) -> ApiResult<EntryPage> {
    let page = read_history(&state, &bank_ref).await?;
    ok(page)
}

// ============================================================================
// GET /v1/banks/{bank_ref}/categories
// ============================================================================

pub async fn bank_categories(
    State(state): State<Arc<AppState>>,
    Path(bank_ref): Path<String>,
) -> ApiResult<Vec<CategoryCount>> {
    let page = read_history(&state, &bank_ref).await?;
    ok(count_categories(&page.entries))
}

/// Read-through listing: primary first, fallback only when the primary is
/// unreachable. A fallback read can see failover-written entries the
/// primary never got.
async fn read_history(state: &AppState, bank_ref: &str) -> Result<EntryPage, ApiError> {
    match state.primary.list_by_bank_ref(bank_ref).await {
        Ok(page) => Ok(page),
        Err(StoreError::Unavailable { detail, .. }) => {
            warn!(bank_ref = bank_ref, detail = %detail,
                  "Primary store unavailable for history read; trying fallback");
            state
                .fallback
                .list_by_bank_ref(bank_ref)
                .await
                .map_err(|e| ApiError::service_unavailable(format!("Both stores failed: {e}")))
        }
        Err(e) => Err(ApiError::internal(e.to_string())),
    }
}

// ============================================================================
// GET /health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
}

pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    state
        .primary
        .health_check()
        .await
        .map_err(|e| ApiError::service_unavailable(format!("Primary store unhealthy: {e}")))?;

    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerEntry;
    use crate::rail::RejectionKind;

    fn stored() -> StoredEntry {
        StoredEntry {
            entry: LedgerEntry::confirmed_debit(
                "u1".into(),
                "u2".into(),
                "b1".into(),
                "b2".into(),
                "note".into(),
                "10".parse().unwrap(),
                "a@b.c".into(),
            ),
            store: "postgres",
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_dto_validation_rules() {
        let valid = TransferApiRequest {
            sender_bank: "bank_1".into(),
            sharable_id: "AAAAAAAAAA".into(),
            amount: "25.00".into(),
            name: "rent share".into(),
            email: "user@example.com".into(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = TransferApiRequest {
            email: "nope".into(),
            ..valid
        };
        assert!(bad_email.validate().is_err());

        let short_note = TransferApiRequest {
            sender_bank: "bank_1".into(),
            sharable_id: "AAAAAAAAAA".into(),
            amount: "25.00".into(),
            name: "no".into(),
            email: "user@example.com".into(),
        };
        assert!(short_note.validate().is_err());

        let short_token = TransferApiRequest {
            sender_bank: "bank_1".into(),
            sharable_id: "short".into(),
            amount: "25.00".into(),
            name: "rent share".into(),
            email: "user@example.com".into(),
        };
        assert!(short_token.validate().is_err());
    }

    #[test]
    fn test_success_maps_to_200() {
        let (status, body) = outcome_response(TransferOutcome::Success {
            entry: stored(),
            used_fallback: false,
        });
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.code, 0);
        let data = body.data.unwrap();
        assert_eq!(data.status, "SUCCESS");
        assert_eq!(data.used_fallback, Some(false));
        assert!(!data.urgent);
    }

    #[test]
    fn test_indeterminate_maps_to_409_not_retry_safe() {
        let (status, body) = outcome_response(TransferOutcome::Indeterminate {
            detail: "response lost".into(),
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, error_codes::INDETERMINATE);
        let data = body.data.unwrap();
        assert!(!data.retry_safe);
        assert!(!data.urgent);
    }

    #[test]
    fn test_recording_failed_is_urgent_and_carries_handle() {
        let (status, body) = outcome_response(TransferOutcome::RecordingFailed {
            rail_confirmation: "https://api.rail.example/transfers/tr-9".into(),
            detail: "both stores down".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let data = body.data.unwrap();
        assert!(data.urgent);
        assert_eq!(
            data.rail_confirmation.as_deref(),
            Some("https://api.rail.example/transfers/tr-9")
        );
    }

    #[test]
    fn test_rail_rejection_keeps_kind_in_status() {
        let (status, body) = outcome_response(TransferOutcome::RailRejected {
            kind: RejectionKind::Destination,
            detail: "unverified".into(),
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.data.unwrap().status, "DESTINATION_REJECTED");
    }
}
