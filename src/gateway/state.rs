use std::sync::Arc;

use crate::ledger::{LedgerStore, PgLedgerStore};
use crate::transfer::TransferOrchestrator;

/// Shared gateway state, constructed once at startup and injected.
///
/// The primary store is held concretely so the health endpoint can reach
/// its connection check; handlers otherwise use it through [`LedgerStore`].
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TransferOrchestrator>,
    pub primary: Arc<PgLedgerStore>,
    pub fallback: Arc<dyn LedgerStore>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<TransferOrchestrator>,
        primary: Arc<PgLedgerStore>,
        fallback: Arc<dyn LedgerStore>,
    ) -> Self {
        Self {
            orchestrator,
            primary,
            fallback,
        }
    }
}
