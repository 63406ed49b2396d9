//! Expense record entity.
//!
//! A record is one expense entry: an opaque date string, a free-text
//! description, a quantity and a signed integer amount. Ids are always
//! assigned by the store, never by the caller.

use serde::{Deserialize, Serialize};

/// Store-assigned record identifier.
pub type RecordId = i64;

/// A single persisted expense entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Unique id within the store.
    pub id: RecordId,
    /// Date as entered by the user. Not parsed or validated.
    pub date: String,
    /// What the money was spent on.
    pub description: String,
    /// Number of items.
    pub quantity: i64,
    /// Signed amount in whole currency units.
    pub amount: i64,
}

/// Create payload: everything a record has except its id.
///
/// An `id` present in an incoming JSON body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub date: String,
    pub description: String,
    pub quantity: i64,
    pub amount: i64,
}

impl NewRecord {
    /// Attach a store-assigned id.
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            date: self.date,
            description: self.description,
            quantity: self.quantity,
            amount: self.amount,
        }
    }
}

/// Next id for a collection: `max(ids) + 1`, or 1 when empty.
///
/// Returns `None` when the maximum id is already `i64::MAX`.
pub fn next_id(records: &[Record]) -> Option<RecordId> {
    records
        .iter()
        .map(|r| r.id)
        .max()
        .unwrap_or(0)
        .max(0)
        .checked_add(1)
}

/// Sum of all amounts, saturating at the `i64` bounds.
pub fn total_amount(records: &[Record]) -> i64 {
    records
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: RecordId, amount: i64) -> Record {
        Record {
            id,
            date: "2024-01-01".to_string(),
            description: "item".to_string(),
            quantity: 1,
            amount,
        }
    }

    #[test]
    fn test_next_id_empty_starts_at_one() {
        assert_eq!(next_id(&[]), Some(1));
    }

    #[test]
    fn test_next_id_uses_maximum_not_length() {
        let records = vec![record(7, 0), record(3, 0)];
        assert_eq!(next_id(&records), Some(8));
    }

    #[test]
    fn test_next_id_ignores_non_positive_ids() {
        // Files written by older versions may carry a zero id
        let records = vec![record(0, 0), record(-4, 0)];
        assert_eq!(next_id(&records), Some(1));
    }

    #[test]
    fn test_next_id_overflow() {
        assert_eq!(next_id(&[record(i64::MAX, 0)]), None);
    }

    #[test]
    fn test_total_amount() {
        assert_eq!(total_amount(&[]), 0);
        assert_eq!(total_amount(&[record(1, 50), record(2, 10), record(3, -5)]), 55);
    }

    #[test]
    fn test_total_amount_saturates() {
        let records = vec![record(1, i64::MAX), record(2, 1)];
        assert_eq!(total_amount(&records), i64::MAX);
    }

    #[test]
    fn test_new_record_ignores_payload_id() {
        let json = r#"{"id":99,"date":"2024-01-02","description":"bus","quantity":1,"amount":10}"#;
        let candidate: NewRecord = serde_json::from_str(json).unwrap();
        let rec = candidate.into_record(1);
        assert_eq!(rec.id, 1);
        assert_eq!(rec.description, "bus");
    }
}
