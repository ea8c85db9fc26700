//! Transfer orchestrator
//!
//! Drives one transfer request through validation, the single rail call,
//! and dual-store recording. The collaborators are injected as trait
//! objects; the orchestrator holds no mutable state of its own, so
//! concurrent runs only share the stores underneath.
//!
//! # Safety Invariants
//!
//! 1. **Validate-before-rail**: both bank records are checked before any
//!    external call, so a broken receiver never costs a rail round trip.
//! 2. **Single submission**: the rail is called exactly once per run; no
//!    code path returns to the rail after a confirmation handle exists.
//! 3. **Record-to-completion**: once the rail confirms, recording runs in a
//!    detached task that reaches a terminal state even if the caller's
//!    context is cancelled mid-await.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::bank::{BankDirectory, EligibleBank, validate_for_transfer};
use crate::ledger::{LedgerEntry, LedgerStore};
use crate::rail::{RailError, RejectionKind, TransferRail};
use crate::sharing::decode_token;

use super::error::{Side, TransferError};
use super::state::TransferPhase;
use super::types::{TransferOutcome, TransferRequest};

/// Composes directory, codec, validator, rail, and the two ledger stores
/// into the end-to-end transfer flow.
///
/// There is no cross-run locking of bank records: concurrent transfers from
/// the same sender are not mutually excluded, and balance sufficiency is the
/// rail's to enforce, not ours.
pub struct TransferOrchestrator {
    banks: Arc<dyn BankDirectory>,
    rail: Arc<dyn TransferRail>,
    primary: Arc<dyn LedgerStore>,
    fallback: Arc<dyn LedgerStore>,
}

impl TransferOrchestrator {
    pub fn new(
        banks: Arc<dyn BankDirectory>,
        rail: Arc<dyn TransferRail>,
        primary: Arc<dyn LedgerStore>,
        fallback: Arc<dyn LedgerStore>,
    ) -> Self {
        Self {
            banks,
            rail,
            primary,
            fallback,
        }
    }

    /// Run one transfer request to a terminal outcome.
    ///
    /// Every outcome named by the caller contract comes back as
    /// `Ok(TransferOutcome)`; the `Err` arm is reserved for internal faults
    /// (bank directory unreachable, recording task lost) that map to a 5xx
    /// at the API boundary.
    pub async fn initiate(
        &self,
        req: TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        debug!(phase = %TransferPhase::Validating, sender_bank = %req.sender_bank_ref,
               "Transfer run started");

        let (sender, receiver) = match self.validate(&req).await {
            Ok(pair) => pair,
            Err(TransferError::Directory(e)) => return Err(TransferError::Directory(e)),
            Err(rejection) => {
                debug!(phase = %TransferPhase::RejectedValidation, code = rejection.code(),
                       "Transfer rejected before any external call");
                return Ok(TransferOutcome::ValidationRejected {
                    code: rejection.code(),
                    reason: rejection.to_string(),
                });
            }
        };

        debug!(phase = %TransferPhase::Transferring, amount = %req.amount,
               "Submitting transfer to rail");

        let confirmation = match self
            .rail
            .execute(&sender.funding_source, &receiver.funding_source, req.amount)
            .await
        {
            Ok(result) => result,
            Err(RailError::Indeterminate { detail }) => {
                // Not a rejection: the rail may have moved the money and the
                // caller must reconcile before any resubmission.
                warn!(phase = %TransferPhase::Indeterminate, detail = %detail,
                      "Rail outcome unknown");
                return Ok(TransferOutcome::Indeterminate { detail });
            }
            Err(rejection) => {
                let kind = rejection
                    .rejection_kind()
                    .unwrap_or(RejectionKind::Unclassified);
                info!(phase = %TransferPhase::RejectedByRail, kind = %kind,
                      "Rail rejected transfer; money did not move");
                return Ok(TransferOutcome::RailRejected {
                    kind,
                    detail: rejection.detail().to_string(),
                });
            }
        };

        info!(location = %confirmation.location_handle,
              "Transfer externally committed; recording");

        let entry = LedgerEntry::confirmed_debit(
            sender.owner_id,
            receiver.owner_id,
            sender.bank_ref,
            receiver.bank_ref,
            req.note,
            req.amount,
            req.initiator_contact,
        );

        // Detached task: recording must reach a terminal phase even if the
        // awaiting context is dropped, or the only local trace of an
        // externally committed transfer is lost with it.
        let task = tokio::spawn(record_with_fallback(
            Arc::clone(&self.primary),
            Arc::clone(&self.fallback),
            entry,
            confirmation.location_handle,
        ));

        task.await
            .map_err(|e| TransferError::RecordingTask(e.to_string()))
    }

    /// Validation phase: decode the receiver token, resolve both bank
    /// records, and check eligibility on both sides.
    async fn validate(
        &self,
        req: &TransferRequest,
    ) -> Result<(EligibleBank, EligibleBank), TransferError> {
        if req.amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }

        let receiver_account = decode_token(&req.receiver_token)?;

        let sender_record = self
            .banks
            .by_local_id(&req.sender_bank_ref)
            .await
            .map_err(TransferError::Directory)?
            .ok_or_else(|| TransferError::SenderBankNotFound(req.sender_bank_ref.clone()))?;

        let receiver_record = self
            .banks
            .by_account_id(&receiver_account)
            .await
            .map_err(TransferError::Directory)?
            .ok_or(TransferError::ReceiverBankNotFound)?;

        let sender = validate_for_transfer(&sender_record).map_err(|reason| {
            TransferError::Validation {
                side: Side::Sender,
                reason,
            }
        })?;
        let receiver = validate_for_transfer(&receiver_record).map_err(|reason| {
            TransferError::Validation {
                side: Side::Receiver,
                reason,
            }
        })?;

        Ok((sender, receiver))
    }
}

/// Recording phase, run detached from the caller.
///
/// Primary first; on any primary failure the same entry goes to the
/// fallback. This is the one automatic retry in the system, safe because it
/// targets a different store, never the rail.
async fn record_with_fallback(
    primary: Arc<dyn LedgerStore>,
    fallback: Arc<dyn LedgerStore>,
    entry: LedgerEntry,
    rail_confirmation: String,
) -> TransferOutcome {
    debug!(phase = %TransferPhase::RecordingPrimary, entry_id = %entry.entry_id,
           store = primary.name(), "Recording ledger entry");

    let primary_err = match primary.record(&entry).await {
        Ok(stored) => {
            info!(phase = %TransferPhase::Done, entry_id = %entry.entry_id,
                  "Transfer recorded in primary store");
            return TransferOutcome::Success {
                entry: stored,
                used_fallback: false,
            };
        }
        Err(e) => e,
    };

    warn!(phase = %TransferPhase::RecordingFallback, entry_id = %entry.entry_id,
          store = primary.name(), error = %primary_err,
          "Primary store failed; falling back");

    match fallback.record(&entry).await {
        Ok(stored) => {
            warn!(phase = %TransferPhase::Done, entry_id = %entry.entry_id,
                  store = fallback.name(),
                  "Transfer recorded in fallback store; primary was bypassed");
            TransferOutcome::Success {
                entry: stored,
                used_fallback: true,
            }
        }
        Err(fallback_err) => {
            error!(phase = %TransferPhase::RecordingFailed, entry_id = %entry.entry_id,
                   rail_confirmation = %rail_confirmation,
                   primary_error = %primary_err, fallback_error = %fallback_err,
                   "Externally committed transfer is not recorded anywhere");
            TransferOutcome::RecordingFailed {
                rail_confirmation,
                detail: format!("primary: {primary_err}; fallback: {fallback_err}"),
            }
        }
    }
}
