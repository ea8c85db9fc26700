//! Linked bank accounts
//!
//! A [`BankRecord`] is a bank account that completed the external linking
//! flow and can act as a transfer endpoint. Records are created by the
//! linking flow (out of scope here) and are read-only to the transfer core.
//!
//! - [`models`] - the record itself and the multi-shape owner id
//! - [`validation`] - transfer-eligibility checks (pure)
//! - [`directory`] - lookup by local ref or rail account id

pub mod directory;
pub mod models;
pub mod validation;

pub use directory::{BankDirectory, PgBankDirectory};
pub use models::{BankRecord, OwnerIdError, OwnerRef};
pub use validation::{EligibleBank, ValidationError, validate_for_transfer};
