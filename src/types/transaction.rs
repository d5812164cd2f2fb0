//! Transaction data structures for batch fraud risk scoring

use serde::{Deserialize, Serialize};

/// Seconds in one 24-hour period; elapsed clocks wrap hour-of-day modulo this.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: u64 = 3_600;

/// A single transaction to be scored for fraud risk.
///
/// Created once at ingestion and never mutated by the scoring core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique, stable transaction identifier
    pub transaction_id: String,

    /// Monetary amount (non-negative, currency-agnostic)
    pub amount: f64,

    /// Seconds elapsed since batch start; may span multiple days
    pub elapsed_seconds: u64,

    /// Anonymized numeric features (28 in the reference dataset)
    pub features: Vec<f64>,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        transaction_id: impl Into<String>,
        amount: f64,
        elapsed_seconds: u64,
        features: Vec<f64>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount,
            elapsed_seconds,
            features,
        }
    }

    /// Hour-of-day bucket in `[0, 23]`, wrapping across multi-day capture
    /// windows.
    pub fn hour_of_day(&self) -> u8 {
        ((self.elapsed_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR) as u8
    }
}

/// A transaction paired with its ground-truth fraud label.
///
/// The label is an evaluation oracle for calibration and method comparison
/// only; the production classifier never sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    /// Ground-truth fraud flag
    pub is_fraud: bool,
}

impl LabeledTransaction {
    /// Attach a label to a transaction.
    pub fn new(transaction: Transaction, is_fraud: bool) -> Self {
        Self {
            transaction,
            is_fraud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_of_day_wraps_across_days() {
        let tx = |elapsed| Transaction::new("tx", 10.0, elapsed, vec![]);

        assert_eq!(tx(0).hour_of_day(), 0);
        assert_eq!(tx(86_399).hour_of_day(), 23);
        assert_eq!(tx(86_400).hour_of_day(), 0);
        assert_eq!(tx(172_799).hour_of_day(), 23);
        assert_eq!(tx(3_600).hour_of_day(), 1);
    }

    #[test]
    fn test_transaction_serialization() {
        let tx = Transaction::new("tx_123", 99.99, 7_200, vec![0.5, -1.2, 3.0]);

        let json = serde_json::to_string(&tx).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(tx.transaction_id, deserialized.transaction_id);
        assert_eq!(tx.amount, deserialized.amount);
        assert_eq!(tx.features, deserialized.features);
    }

    #[test]
    fn test_labeled_transaction_flattens() {
        let labeled =
            LabeledTransaction::new(Transaction::new("tx_9", 1.0, 0, vec![0.0]), true);

        let json = serde_json::to_string(&labeled).unwrap();
        assert!(json.contains("\"transaction_id\""));
        assert!(json.contains("\"is_fraud\":true"));

        let deserialized: LabeledTransaction = serde_json::from_str(&json).unwrap();
        assert!(deserialized.is_fraud);
        assert_eq!(deserialized.transaction.transaction_id, "tx_9");
    }
}
