//! Ledger entry model
//!
//! The entry id is generated before any store write, so the same logical
//! transfer carries the same id no matter which store ends up holding it.
//! That id is the idempotency key of the primary store's upsert and the
//! handle reconciliation tooling uses to pair rows across stores.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entry direction from the perspective of the initiating side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "credit" => Some(Direction::Credit),
            "debit" => Some(Direction::Debit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Default category bucket for transfers initiated through this service.
pub const CATEGORY_TRANSFER: &str = "Transfer";

/// Default channel for transfers initiated through this service.
pub const CHANNEL_ONLINE: &str = "online";

/// The durable record of one transfer, independent of storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub entry_id: Uuid,
    pub sender_owner_id: String,
    pub receiver_owner_id: String,
    pub sender_bank_ref: String,
    pub receiver_bank_ref: String,
    /// Free-text transfer note
    pub name: String,
    /// Always rescaled to exactly two fractional digits
    pub amount: Decimal,
    pub direction: Direction,
    pub category: String,
    pub channel: String,
    /// False once the rail has confirmed the transfer
    pub pending: bool,
    pub occurred_at: NaiveDate,
    pub initiator_contact: String,
}

impl LedgerEntry {
    /// Build the entry for a rail-confirmed transfer, generating the entry id.
    ///
    /// The initiating side is the sender, so the direction is always debit.
    #[allow(clippy::too_many_arguments)]
    pub fn confirmed_debit(
        sender_owner_id: String,
        receiver_owner_id: String,
        sender_bank_ref: String,
        receiver_bank_ref: String,
        name: String,
        amount: Decimal,
        initiator_contact: String,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            sender_owner_id,
            receiver_owner_id,
            sender_bank_ref,
            receiver_bank_ref,
            name,
            amount: fixed_2dp(amount),
            direction: Direction::Debit,
            category: CATEGORY_TRANSFER.to_string(),
            channel: CHANNEL_ONLINE.to_string(),
            pending: false,
            occurred_at: Utc::now().date_naive(),
            initiator_contact,
        }
    }

    /// The amount as the fixed-point wire string ("12.50", never "12.5").
    pub fn amount_string(&self) -> String {
        fixed_2dp(self.amount).to_string()
    }
}

/// Round half-up to cents and force a scale of exactly 2.
pub fn fixed_2dp(amount: Decimal) -> Decimal {
    let mut a = amount.round_dp(2);
    a.rescale(2);
    a
}

/// A ledger entry as one store returned it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    #[serde(flatten)]
    pub entry: LedgerEntry,
    /// Name of the store that holds this copy
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of history for a bank ref.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPage {
    /// Sum of sender-side and receiver-side match counts
    pub total: u64,
    pub entries: Vec<StoredEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_amount_forced_to_two_digits() {
        assert_eq!(fixed_2dp(dec("12.5")).to_string(), "12.50");
        assert_eq!(fixed_2dp(dec("12")).to_string(), "12.00");
        assert_eq!(fixed_2dp(dec("12.345")).to_string(), "12.35");
        assert_eq!(fixed_2dp(dec("0.005")).to_string(), "0.01");
    }

    #[test]
    fn test_confirmed_debit_defaults() {
        let entry = LedgerEntry::confirmed_debit(
            "user_1".into(),
            "user_2".into(),
            "bank_1".into(),
            "bank_2".into(),
            "rent".into(),
            dec("100.5"),
            "user1@example.com".into(),
        );

        assert_eq!(entry.direction, Direction::Debit);
        assert_eq!(entry.category, CATEGORY_TRANSFER);
        assert_eq!(entry.channel, CHANNEL_ONLINE);
        assert!(!entry.pending);
        assert_eq!(entry.amount_string(), "100.50");
    }

    #[test]
    fn test_entry_ids_are_unique_per_entry() {
        let build = || {
            LedgerEntry::confirmed_debit(
                "u1".into(),
                "u2".into(),
                "b1".into(),
                "b2".into(),
                "n".into(),
                dec("1"),
                "a@b.c".into(),
            )
        };
        assert_ne!(build().entry_id, build().entry_id);
    }

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!(Direction::from_str("debit"), Some(Direction::Debit));
        assert_eq!(Direction::from_str("credit"), Some(Direction::Credit));
        assert_eq!(Direction::from_str("DEBIT"), None);
        assert_eq!(Direction::Debit.to_string(), "debit");
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let entry = LedgerEntry::confirmed_debit(
            "u1".into(),
            "u2".into(),
            "b1".into(),
            "b2".into(),
            "n".into(),
            dec("1"),
            "a@b.c".into(),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("senderOwnerId").is_some());
        assert!(json.get("receiverBankRef").is_some());
        assert!(json.get("occurredAt").is_some());
        assert_eq!(json["direction"], "debit");
    }
}
