//! Category buckets for the reporting consumer
//!
//! The aggregation/reporting layer itself is out of scope; this is the
//! shaping function its contract requires. Every bucket name is populated:
//! an entry with a blank category falls into the transfer bucket, so the
//! consumer never renders an unnamed slice.

use std::collections::HashMap;

use serde::Serialize;

use super::entry::{CATEGORY_TRANSFER, StoredEntry};

/// One display bucket: category name and how many entries fell into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

/// Bucket entries by category, descending by count.
///
/// Ties break alphabetically so the output is deterministic.
pub fn count_categories(entries: &[StoredEntry]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for stored in entries {
        let category = match stored.entry.category.trim() {
            "" => CATEGORY_TRANSFER,
            c => c,
        };
        *counts.entry(category).or_insert(0) += 1;
    }

    let mut buckets: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.to_string(),
            count,
        })
        .collect();

    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::LedgerEntry;

    fn stored(category: &str) -> StoredEntry {
        let mut entry = LedgerEntry::confirmed_debit(
            "u1".into(),
            "u2".into(),
            "b1".into(),
            "b2".into(),
            "note".into(),
            "10".parse().unwrap(),
            "a@b.c".into(),
        );
        entry.category = category.to_string();
        StoredEntry {
            entry,
            store: "test",
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_buckets_sorted_by_count_then_name() {
        let entries = vec![
            stored("Transfer"),
            stored("Transfer"),
            stored("Groceries"),
            stored("Income"),
            stored("Income"),
        ];

        let buckets = count_categories(&entries);
        assert_eq!(
            buckets,
            vec![
                CategoryCount {
                    name: "Income".into(),
                    count: 2
                },
                CategoryCount {
                    name: "Transfer".into(),
                    count: 2
                },
                CategoryCount {
                    name: "Groceries".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_blank_category_falls_into_transfer_bucket() {
        let entries = vec![stored(""), stored("  "), stored("Transfer")];
        let buckets = count_categories(&entries);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name, "Transfer");
        assert_eq!(buckets[0].count, 3);
    }

    #[test]
    fn test_empty_input_yields_no_buckets() {
        assert!(count_categories(&[]).is_empty());
    }
}
