//! Transfer request and outcome types

use rust_decimal::Decimal;

use crate::ledger::StoredEntry;
use crate::rail::RejectionKind;

/// Ephemeral input to one orchestration run. Consumed once, never persisted.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Local reference to the sender's bank record
    pub sender_bank_ref: String,
    /// Opaque shareable token supplied by the counterparty
    pub receiver_token: String,
    /// Must be positive; currency is fixed to a single unit of account
    pub amount: Decimal,
    /// Free-text note, becomes the ledger entry name
    pub note: String,
    /// Email or similar, recorded on the ledger entry
    pub initiator_contact: String,
}

/// Terminal result of one orchestration run.
#[derive(Debug)]
pub enum TransferOutcome {
    /// Money moved and the entry is durably recorded. `used_fallback` means
    /// the primary store was bypassed; reconciliation tooling wants to know.
    Success {
        entry: StoredEntry,
        used_fallback: bool,
    },

    /// The request never reached the rail. Resubmitting is always safe.
    ValidationRejected {
        code: &'static str,
        reason: String,
    },

    /// The rail refused; money did not move. Retry after fixing the cause.
    RailRejected {
        kind: RejectionKind,
        detail: String,
    },

    /// The rail's answer was lost. The caller must NOT auto-retry: the
    /// transfer has to be reconciled against the rail out-of-band first.
    Indeterminate { detail: String },

    /// Money moved but neither store holds the entry. Urgent: the
    /// confirmation handle is the only remaining trace.
    RecordingFailed {
        rail_confirmation: String,
        detail: String,
    },
}

impl TransferOutcome {
    /// Stable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferOutcome::Success { .. } => "SUCCESS",
            TransferOutcome::ValidationRejected { .. } => "VALIDATION_REJECTED",
            TransferOutcome::RailRejected { kind, .. } => kind.as_str(),
            TransferOutcome::Indeterminate { .. } => "INDETERMINATE_TRANSFER",
            TransferOutcome::RecordingFailed { .. } => "RECORDING_FAILED",
        }
    }
}
