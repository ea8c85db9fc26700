//! External payment rail
//!
//! The rail is the third-party network that actually moves money between
//! funding sources. This module owns the one call that is irreversible:
//! once the rail returns a confirmation handle, the transfer is externally
//! committed no matter what happens locally afterwards.
//!
//! # Safety Invariants
//!
//! 1. **Single submission**: the client never retries on its own. A duplicate
//!    submission moves money twice.
//! 2. **Indeterminate is its own kind**: a network failure where the
//!    confirmation may have been produced but was never read is not a
//!    rejection; it must reach the caller as indeterminate so nobody
//!    auto-retries it.

pub mod client;
pub mod error;

pub use client::RailClient;
pub use error::{RailError, RejectionKind};

use async_trait::async_trait;
use rust_decimal::Decimal;
use url::Url;

/// Outcome of a rail transfer call.
///
/// Holding one of these means money moved: the location handle is the rail's
/// confirmation reference and the only proof of the external commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailTransferResult {
    pub location_handle: String,
}

/// Capability interface over the rail's transfer endpoint.
#[async_trait]
pub trait TransferRail: Send + Sync {
    /// Rail name for logging
    fn name(&self) -> &'static str;

    /// Move `amount` from `source` to `destination`.
    ///
    /// Both handles must already be validated funding-source URLs; the
    /// amount must be positive. Exactly one request is issued per call.
    async fn execute(
        &self,
        source: &Url,
        destination: &Url,
        amount: Decimal,
    ) -> Result<RailTransferResult, RailError>;
}
