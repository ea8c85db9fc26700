//! Transfer orchestration
//!
//! Composes the identifier codec, the eligibility validator, the rail
//! client, and the two ledger stores into the end-to-end transfer flow.
//!
//! # Phases
//!
//! ```text
//! VALIDATING → TRANSFERRING → RECORDING_PRIMARY → DONE
//!     ↓             ↓               ↓
//! REJECTED_     REJECTED_      RECORDING_FALLBACK → DONE
//! VALIDATION    BY_RAIL             ↓
//!               INDETERMINATE  RECORDING_FAILED
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Validate-before-rail**: ineligible records never reach the rail
//! 2. **Single submission**: no path re-enters TRANSFERRING once a
//!    confirmation handle exists
//! 3. **Record-to-completion**: recording is detached from caller
//!    cancellation
//! 4. **Indeterminate is first-class**: never folded into a rejection,
//!    never auto-retried

pub mod error;
pub mod orchestrator;
pub mod state;
pub mod types;


// Re-exports for convenience
pub use error::{Side, TransferError};
pub use orchestrator::TransferOrchestrator;
pub use state::TransferPhase;
pub use types::{TransferOutcome, TransferRequest};
