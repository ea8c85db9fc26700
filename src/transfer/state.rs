//! Transfer run phases
//!
//! One orchestration run walks `VALIDATING → TRANSFERRING →
//! RECORDING_PRIMARY → RECORDING_FALLBACK → DONE`, bailing into a terminal
//! failure phase at each gate. The run is linear: no phase is ever
//! re-entered, and in particular nothing returns to `TRANSFERRING` once the
//! rail has produced a confirmation handle.

use std::fmt;

/// Phases of one transfer orchestration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferPhase {
    /// Decoding the receiver token and checking both bank records
    Validating,
    /// The single rail call is in flight
    Transferring,
    /// Writing the ledger entry to the primary store
    RecordingPrimary,
    /// Primary failed; writing the same entry to the fallback store
    RecordingFallback,
    /// Terminal: recorded (in one store or the other)
    Done,
    /// Terminal: request never reached the rail; fully retryable
    RejectedValidation,
    /// Terminal: the rail refused; money did not move
    RejectedByRail,
    /// Terminal: rail outcome unknown; must reconcile before resubmitting
    Indeterminate,
    /// Terminal: money moved, neither store holds the entry
    RecordingFailed,
}

impl TransferPhase {
    /// Check if this phase ends the run
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferPhase::Done
                | TransferPhase::RejectedValidation
                | TransferPhase::RejectedByRail
                | TransferPhase::Indeterminate
                | TransferPhase::RecordingFailed
        )
    }

    /// Check if the rail has confirmed by the time this phase is reached.
    ///
    /// From any of these phases onward the transfer must run to a terminal
    /// phase even if the caller goes away: abandoning it would lose the only
    /// local trace of moved money.
    #[inline]
    pub fn is_externally_committed(&self) -> bool {
        matches!(
            self,
            TransferPhase::RecordingPrimary
                | TransferPhase::RecordingFallback
                | TransferPhase::Done
                | TransferPhase::RecordingFailed
        )
    }

    /// Get human-readable phase name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::Validating => "VALIDATING",
            TransferPhase::Transferring => "TRANSFERRING",
            TransferPhase::RecordingPrimary => "RECORDING_PRIMARY",
            TransferPhase::RecordingFallback => "RECORDING_FALLBACK",
            TransferPhase::Done => "DONE",
            TransferPhase::RejectedValidation => "REJECTED_VALIDATION",
            TransferPhase::RejectedByRail => "REJECTED_BY_RAIL",
            TransferPhase::Indeterminate => "INDETERMINATE",
            TransferPhase::RecordingFailed => "RECORDING_FAILED",
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
