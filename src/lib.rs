//! paybridge - Funds Transfer Orchestration
//!
//! Moves money between linked bank accounts over an external payment rail
//! and records every transfer in a dual-store ledger (PostgreSQL primary,
//! document-store fallback).
//!
//! # Modules
//!
//! - [`sharing`] - reversible codec for shareable account tokens
//! - [`bank`] - bank records, owner-id normalization, eligibility validation,
//!   directory lookup
//! - [`rail`] - external payment rail client
//! - [`ledger`] - ledger entry model and the two store implementations
//! - [`transfer`] - the orchestrator composing all of the above
//! - [`gateway`] - HTTP surface
//! - [`config`] / [`logging`] - startup configuration and tracing setup

pub mod bank;
pub mod config;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod rail;
pub mod sharing;
pub mod transfer;

// Convenient re-exports at crate root
pub use bank::{BankDirectory, BankRecord, OwnerRef};
pub use ledger::{LedgerEntry, LedgerStore, StoreError, StoredEntry};
pub use rail::{RailClient, RailError, RailTransferResult, TransferRail};
pub use sharing::{decode_token, encode_account_id};
pub use transfer::{
    TransferError, TransferOrchestrator, TransferOutcome, TransferPhase, TransferRequest,
};
