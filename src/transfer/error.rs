//! Transfer error types

use thiserror::Error;

use crate::bank::ValidationError;
use crate::ledger::StoreError;
use crate::rail::RailError;
use crate::sharing::TokenError;

/// Which bank record an error points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Sender,
    Receiver,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Sender => "sender",
            Side::Receiver => "receiver",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transfer orchestration errors
#[derive(Debug, Error)]
pub enum TransferError {
    // === Validation stage (no external state changed, fully retryable) ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Shareable token rejected: {0}")]
    MalformedToken(#[from] TokenError),

    #[error("Sender bank record not found: {0}")]
    SenderBankNotFound(String),

    #[error("No bank record is linked to the shared account id")]
    ReceiverBankNotFound,

    #[error("The {side} bank record is not transfer-eligible: {reason}")]
    Validation { side: Side, reason: ValidationError },

    // === Rail stage ===
    #[error(transparent)]
    Rail(#[from] RailError),

    // === Recording stage ===
    #[error("Transfer confirmed by the rail ({rail_confirmation}) but recorded nowhere: {detail}")]
    RecordingFailed {
        rail_confirmation: String,
        detail: String,
    },

    // === Internal faults (not part of the outcome taxonomy) ===
    #[error("Bank directory unavailable: {0}")]
    Directory(StoreError),

    #[error("Recording task failed: {0}")]
    RecordingTask(String),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::MalformedToken(e) => e.code(),
            TransferError::SenderBankNotFound(_) => "SENDER_BANK_NOT_FOUND",
            TransferError::ReceiverBankNotFound => "RECEIVER_BANK_NOT_FOUND",
            TransferError::Validation { reason, .. } => reason.code(),
            TransferError::Rail(e) => e.code(),
            TransferError::RecordingFailed { .. } => "RECORDING_FAILED",
            TransferError::Directory(_) => "DIRECTORY_UNAVAILABLE",
            TransferError::RecordingTask(_) => "RECORDING_TASK_FAILED",
        }
    }

    /// Validation-stage errors left no external trace: resubmitting the same
    /// request is always safe.
    pub fn is_safe_to_retry(&self) -> bool {
        matches!(
            self,
            TransferError::InvalidAmount
                | TransferError::MalformedToken(_)
                | TransferError::SenderBankNotFound(_)
                | TransferError::ReceiverBankNotFound
                | TransferError::Validation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sharing::TokenError;

    #[test]
    fn test_error_codes() {
        assert_eq!(TransferError::InvalidAmount.code(), "INVALID_AMOUNT");
        assert_eq!(
            TransferError::MalformedToken(TokenError::ChecksumMismatch).code(),
            "TOKEN_CHECKSUM_MISMATCH"
        );
        assert_eq!(
            TransferError::Rail(RailError::Indeterminate {
                detail: "x".into()
            })
            .code(),
            "INDETERMINATE_TRANSFER"
        );
    }

    #[test]
    fn test_validation_errors_are_retryable() {
        assert!(TransferError::InvalidAmount.is_safe_to_retry());
        assert!(TransferError::ReceiverBankNotFound.is_safe_to_retry());

        assert!(
            !TransferError::Rail(RailError::Indeterminate {
                detail: "x".into()
            })
            .is_safe_to_retry()
        );
        assert!(
            !TransferError::RecordingFailed {
                rail_confirmation: "h".into(),
                detail: "d".into()
            }
            .is_safe_to_retry()
        );
    }

    #[test]
    fn test_validation_message_names_the_side() {
        let err = TransferError::Validation {
            side: Side::Receiver,
            reason: ValidationError::MissingFundingSource,
        };
        assert!(err.to_string().contains("receiver"));
    }
}
